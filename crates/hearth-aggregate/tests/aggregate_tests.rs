// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard refresh against mock services.

use std::sync::Arc;

use hearth_aggregate::AggregationEngine;
use hearth_config::model::ConnectorConfig;
use hearth_connector::{ConnectorClient, ConnectorHub};
use hearth_core::{AuthType, ConnectionStore, Endpoint, SyncStatus};
use hearth_test_utils::{ConnectionFixture, MemoryStore, test_vault};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(store: &MemoryStore) -> AggregationEngine {
    let hub = Arc::new(ConnectorHub::new(
        ConnectorClient::new(&ConnectorConfig::default()).unwrap(),
        test_vault(),
    ));
    AggregationEngine::new(Arc::new(store.clone()), Arc::new(store.clone()), hub)
}

async fn track_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"title": "Bins"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn endpoint_failure_is_a_widget_not_a_connection_error() {
    let server = track_server().await;
    let store = MemoryStore::new();
    let connection = ConnectionFixture::new("u1", &server.uri())
        .frontend_url("http://track.example/app")
        .endpoints(vec![
            Endpoint::get("tasks", "/api/tasks", Some("Tasks")),
            Endpoint::get("projects", "/api/projects", None),
        ])
        .build(&test_vault());
    store.insert_connection(&connection).await.unwrap();

    let snapshot = engine(&store).refresh("u1").await.unwrap();

    assert!(snapshot.refresh_errors.is_empty());
    assert_eq!(snapshot.widgets.len(), 2);
    let tasks = &snapshot.widgets[0];
    assert_eq!(tasks.label, "Tasks");
    assert_eq!(tasks.service_name, "Track");
    assert_eq!(tasks.frontend_url.as_deref(), Some("http://track.example/app"));
    assert_eq!(tasks.data, Some(json!([{"title": "Bins"}])));
    assert!(tasks.error.is_none());

    let projects = &snapshot.widgets[1];
    assert_eq!(projects.label, "projects");
    assert!(projects.data.is_none());
    assert!(projects.error.as_deref().unwrap().contains("500"));

    let stored = store.get_connection(&connection.id).await.unwrap().unwrap();
    assert_eq!(stored.last_sync_status, Some(SyncStatus::Success));
    assert!(stored.last_sync_at.is_some());
    assert!(stored.last_sync_error.is_none());
}

#[tokio::test]
async fn login_failure_records_error_and_other_connections_continue() {
    let server = track_server().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let vault = test_vault();
    let broken = ConnectionFixture::new("u1", &server.uri())
        .service("calendar", "Family Calendar")
        .auth(
            AuthType::FormGrant,
            json!({"username": "me", "password": "wrong"}),
        )
        .build(&vault);
    let working = ConnectionFixture::new("u1", &server.uri()).build(&vault);
    store.insert_connection(&broken).await.unwrap();
    store.insert_connection(&working).await.unwrap();

    let snapshot = engine(&store).refresh("u1").await.unwrap();

    assert_eq!(snapshot.refresh_errors.len(), 1);
    assert!(snapshot.refresh_errors[0].starts_with("Family Calendar: "));
    assert_eq!(snapshot.widgets.len(), 1);
    assert_eq!(snapshot.widgets[0].service_type, "track");

    let stored = store.get_connection(&broken.id).await.unwrap().unwrap();
    assert_eq!(stored.last_sync_status, Some(SyncStatus::Error));
    assert!(stored.last_sync_error.unwrap().contains("401"));
}

#[tokio::test]
async fn second_refresh_replaces_snapshot() {
    let server = track_server().await;
    let store = MemoryStore::new();
    let vault = test_vault();
    let first = ConnectionFixture::new("u1", &server.uri()).build(&vault);
    store.insert_connection(&first).await.unwrap();

    let engine = engine(&store);
    engine.refresh("u1").await.unwrap();

    let mut disabled = first.clone();
    disabled.enabled = false;
    store.update_connection(&disabled).await.unwrap();
    let second = engine.refresh("u1").await.unwrap();

    assert_eq!(store.snapshot_count().await, 1);
    assert!(second.widgets.is_empty());
    assert_eq!(engine.dashboard("u1").await.unwrap(), second);
}

#[tokio::test]
async fn dashboard_for_unknown_user_is_empty() {
    let store = MemoryStore::new();
    let snapshot = engine(&store).dashboard("nobody").await.unwrap();
    assert!(snapshot.widgets.is_empty());
    assert!(snapshot.last_refreshed_at.is_none());
    assert!(snapshot.refresh_errors.is_empty());
}

#[tokio::test]
async fn refresh_summary_reports_error_count() {
    let store = MemoryStore::new();
    let undecryptable = {
        let mut c = ConnectionFixture::new("u1", "http://127.0.0.1:9").build(&test_vault());
        c.encrypted_credentials = "not-a-vault-token".to_string();
        c
    };
    store.insert_connection(&undecryptable).await.unwrap();

    let summary = engine(&store).refresh_summary("u1").await.unwrap();
    assert!(!summary.success);
    assert_eq!(summary.message, "1 error(s) during refresh");
    assert_eq!(summary.widgets_count, 0);
}

#[tokio::test]
async fn snapshot_write_failure_is_returned() {
    let store = MemoryStore::new();
    store.fail_snapshot_writes_for("u1").await;
    assert!(engine(&store).refresh("u1").await.is_err());
}

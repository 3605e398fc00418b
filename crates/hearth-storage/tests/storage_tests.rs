// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait-level tests for the SQLite stores.

use std::sync::Arc;

use chrono::{Duration, Utc};
use hearth_config::model::StorageConfig;
use hearth_core::{
    AuthType, ChatMessage, ChatSession, Connection, ConnectionStore, DashboardSnapshot, Endpoint,
    SessionStore, SnapshotStore, StorageAdapter, SyncRecord, SyncStatus, Widget,
};
use hearth_storage::SqliteStorage;
use tempfile::TempDir;

async fn open_storage() -> (Arc<SqliteStorage>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearth.db");
    let storage = SqliteStorage::new(StorageConfig {
        database_path: path.to_str().unwrap().to_string(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    (Arc::new(storage), dir)
}

fn connection(id: &str, user_id: &str, offset_secs: i64) -> Connection {
    let created = Utc::now() + Duration::seconds(offset_secs);
    Connection {
        id: id.into(),
        user_id: user_id.into(),
        service_type: "calendar".into(),
        display_name: format!("Calendar {id}"),
        base_url: "http://calendar.local".into(),
        frontend_url: None,
        auth_type: AuthType::FormGrant,
        encrypted_credentials: "sealed".into(),
        endpoints: vec![Endpoint::get("week", "/api/events/week", Some("This Week"))],
        enabled: true,
        last_sync_at: None,
        last_sync_status: None,
        last_sync_error: None,
        created_at: created,
        updated_at: created,
    }
}

#[tokio::test]
async fn connections_list_oldest_first_and_scope_to_user() {
    let (storage, _dir) = open_storage().await;
    let store: Arc<dyn ConnectionStore> = storage.clone();

    store.insert_connection(&connection("late", "u1", 10)).await.unwrap();
    store.insert_connection(&connection("early", "u1", 0)).await.unwrap();
    store.insert_connection(&connection("theirs", "u2", 5)).await.unwrap();

    let ids: Vec<String> = store
        .list_connections("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["early", "late"]);
}

#[tokio::test]
async fn disabling_a_connection_drops_user_from_refresh_set() {
    let (storage, _dir) = open_storage().await;
    let store: Arc<dyn ConnectionStore> = storage.clone();

    let mut conn = connection("c1", "u1", 0);
    store.insert_connection(&conn).await.unwrap();
    assert_eq!(store.users_with_enabled_connections().await.unwrap(), vec!["u1"]);

    conn.enabled = false;
    conn.updated_at = Utc::now();
    store.update_connection(&conn).await.unwrap();

    assert!(store.users_with_enabled_connections().await.unwrap().is_empty());
    assert!(store.list_enabled_connections("u1").await.unwrap().is_empty());
    assert_eq!(store.list_connections("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn sync_record_round_trips() {
    let (storage, _dir) = open_storage().await;
    storage.insert_connection(&connection("c1", "u1", 0)).await.unwrap();

    let record = SyncRecord {
        at: Utc::now(),
        status: SyncStatus::Success,
        error: None,
    };
    storage.record_sync("c1", &record).await.unwrap();

    let loaded = storage.get_connection("c1").await.unwrap().unwrap();
    assert_eq!(loaded.last_sync_status, Some(SyncStatus::Success));
    assert_eq!(loaded.last_sync_at, Some(record.at));
    assert!(loaded.last_sync_error.is_none());
}

#[tokio::test]
async fn sessions_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hearth.db");
    let config = StorageConfig {
        database_path: path.to_str().unwrap().to_string(),
        wal_mode: true,
    };
    let now = Utc::now();
    let session = ChatSession {
        id: "s1".into(),
        user_id: "u1".into(),
        title: "Groceries".into(),
        messages: vec![
            ChatMessage::user("Groceries"),
            ChatMessage::assistant("Milk and eggs.", Vec::new()),
        ],
        created_at: now,
        updated_at: now,
    };

    {
        let storage = SqliteStorage::new(config.clone());
        storage.initialize().await.unwrap();
        storage.save_session(&session).await.unwrap();
        storage.close().await.unwrap();
    }

    let storage = SqliteStorage::new(config);
    storage.initialize().await.unwrap();
    assert_eq!(storage.get_session("s1").await.unwrap().unwrap(), session);
    let summaries = storage.list_sessions("u1").await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].message_count, 2);
    assert!(storage.delete_session("s1").await.unwrap());
    assert!(storage.list_sessions("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn snapshot_upsert_keeps_one_row_per_user() {
    let (storage, _dir) = open_storage().await;
    let store: Arc<dyn SnapshotStore> = storage.clone();

    for round in 0..3 {
        let snapshot = DashboardSnapshot {
            user_id: "u1".into(),
            widgets: vec![Widget {
                service_type: "track".into(),
                service_name: "Track".into(),
                frontend_url: None,
                endpoint_name: "tasks".into(),
                label: "Tasks".into(),
                data: Some(serde_json::json!({ "round": round })),
                error: None,
            }],
            last_refreshed_at: Some(Utc::now()),
            refresh_errors: Vec::new(),
        };
        store.upsert_snapshot(&snapshot).await.unwrap();
    }

    let loaded = store.get_snapshot("u1").await.unwrap().unwrap();
    assert_eq!(loaded.widgets.len(), 1);
    assert_eq!(loaded.widgets[0].data, Some(serde_json::json!({ "round": 2 })));
    assert!(store.get_snapshot("u2").await.unwrap().is_none());
}

// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user dashboard refresh.
//!
//! A refresh walks the user's enabled connections, turns every endpoint
//! result into a widget, records each connection's sync outcome, and
//! replaces the user's snapshot wholesale.

use std::sync::Arc;

use chrono::Utc;
use hearth_connector::{ConnectorHub, EndpointResult};
use hearth_core::{
    Connection, ConnectionStore, DashboardSnapshot, HearthError, SnapshotStore, SyncRecord,
    SyncStatus, Widget,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of an on-demand refresh, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub success: bool,
    pub message: String,
    pub widgets_count: usize,
}

impl RefreshSummary {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        let errors = snapshot.refresh_errors.len();
        Self {
            success: errors == 0,
            message: if errors == 0 {
                "Dashboard refreshed".to_string()
            } else {
                format!("{errors} error(s) during refresh")
            },
            widgets_count: snapshot.widgets.len(),
        }
    }
}

pub struct AggregationEngine {
    connections: Arc<dyn ConnectionStore>,
    snapshots: Arc<dyn SnapshotStore>,
    hub: Arc<ConnectorHub>,
}

impl AggregationEngine {
    pub fn new(
        connections: Arc<dyn ConnectionStore>,
        snapshots: Arc<dyn SnapshotStore>,
        hub: Arc<ConnectorHub>,
    ) -> Self {
        Self {
            connections,
            snapshots,
            hub,
        }
    }

    /// Rebuilds and stores the user's snapshot.
    ///
    /// A connection that fails as a whole (credentials, login, transport)
    /// contributes one `"{display name}: {error}"` entry and no widgets.
    /// Endpoint-level failures become error widgets and leave the
    /// connection's sync status at `success`.
    pub async fn refresh(&self, user_id: &str) -> Result<DashboardSnapshot, HearthError> {
        let connections = self.connections.list_enabled_connections(user_id).await?;
        let mut widgets = Vec::new();
        let mut errors = Vec::new();

        for connection in &connections {
            let sync = match self.hub.fetch_all(connection).await {
                Ok(results) => {
                    widgets.extend(results.into_iter().map(|r| widget(connection, r)));
                    SyncRecord {
                        at: Utc::now(),
                        status: SyncStatus::Success,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(
                        connection_id = connection.id.as_str(),
                        error = %e,
                        "connection refresh failed"
                    );
                    errors.push(format!("{}: {e}", connection.display_name));
                    SyncRecord {
                        at: Utc::now(),
                        status: SyncStatus::Error,
                        error: Some(e.to_string()),
                    }
                }
            };

            if let Err(e) = self.connections.record_sync(&connection.id, &sync).await {
                warn!(
                    connection_id = connection.id.as_str(),
                    error = %e,
                    "failed to record sync status"
                );
            }
        }

        let snapshot = DashboardSnapshot {
            user_id: user_id.to_string(),
            widgets,
            last_refreshed_at: Some(Utc::now()),
            refresh_errors: errors,
        };
        self.snapshots.upsert_snapshot(&snapshot).await?;

        debug!(
            user_id,
            connections = connections.len(),
            widgets = snapshot.widgets.len(),
            errors = snapshot.refresh_errors.len(),
            "snapshot stored"
        );
        Ok(snapshot)
    }

    /// Refreshes and summarizes the outcome.
    pub async fn refresh_summary(&self, user_id: &str) -> Result<RefreshSummary, HearthError> {
        let snapshot = self.refresh(user_id).await?;
        let summary = RefreshSummary::from_snapshot(&snapshot);
        info!(
            user_id,
            widgets = summary.widgets_count,
            success = summary.success,
            "dashboard refreshed on demand"
        );
        Ok(summary)
    }

    /// The stored snapshot, or an empty one if the user was never refreshed.
    pub async fn dashboard(&self, user_id: &str) -> Result<DashboardSnapshot, HearthError> {
        Ok(self
            .snapshots
            .get_snapshot(user_id)
            .await?
            .unwrap_or_else(|| DashboardSnapshot::empty(user_id)))
    }
}

fn widget(connection: &Connection, result: EndpointResult) -> Widget {
    let (data, error) = match result.outcome {
        Ok(data) => (Some(data), None),
        Err(e) => (None, Some(e)),
    };
    Widget {
        service_type: connection.service_type.clone(),
        service_name: connection.display_name.clone(),
        frontend_url: connection.frontend_url.clone(),
        endpoint_name: result.name,
        label: result.label,
        data,
        error,
    }
}

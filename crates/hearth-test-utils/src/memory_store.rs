// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of every Hearth store trait.
//!
//! Supports fault injection so scheduler and engine tests can exercise their
//! error paths without a database.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hearth_core::traits::storage::{ConnectionStore, SessionStore, SnapshotStore};
use hearth_core::types::{ChatSession, Connection, DashboardSnapshot, SessionSummary, SyncRecord};
use hearth_core::HearthError;

#[derive(Default)]
struct Inner {
    connections: Vec<Connection>,
    sessions: HashMap<String, ChatSession>,
    snapshots: HashMap<String, DashboardSnapshot>,
    session_saves: usize,
    fail_user_listing: bool,
    fail_snapshot_users: HashSet<String>,
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

fn injected(what: &str) -> HearthError {
    HearthError::Storage {
        source: Box::new(std::io::Error::other(format!("injected failure: {what}"))),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `users_with_enabled_connections` fail while `fail` is set.
    pub async fn fail_user_listing(&self, fail: bool) {
        self.inner.lock().await.fail_user_listing = fail;
    }

    /// Makes snapshot writes for `user_id` fail.
    pub async fn fail_snapshot_writes_for(&self, user_id: &str) {
        self.inner
            .lock()
            .await
            .fail_snapshot_users
            .insert(user_id.to_string());
    }

    /// Number of `save_session` calls so far.
    pub async fn session_saves(&self) -> usize {
        self.inner.lock().await.session_saves
    }

    pub async fn snapshot_count(&self) -> usize {
        self.inner.lock().await.snapshots.len()
    }
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn insert_connection(&self, connection: &Connection) -> Result<(), HearthError> {
        let mut inner = self.inner.lock().await;
        if inner.connections.iter().any(|c| c.id == connection.id) {
            return Err(HearthError::Internal(format!(
                "duplicate connection id {}",
                connection.id
            )));
        }
        inner.connections.push(connection.clone());
        Ok(())
    }

    async fn update_connection(&self, connection: &Connection) -> Result<(), HearthError> {
        let mut inner = self.inner.lock().await;
        match inner.connections.iter_mut().find(|c| c.id == connection.id) {
            Some(existing) => {
                *existing = connection.clone();
                Ok(())
            }
            None => Err(HearthError::NotFound {
                entity: "connection",
                id: connection.id.clone(),
            }),
        }
    }

    async fn get_connection(&self, id: &str) -> Result<Option<Connection>, HearthError> {
        let inner = self.inner.lock().await;
        Ok(inner.connections.iter().find(|c| c.id == id).cloned())
    }

    async fn list_connections(&self, user_id: &str) -> Result<Vec<Connection>, HearthError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .connections
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_enabled_connections(
        &self,
        user_id: &str,
    ) -> Result<Vec<Connection>, HearthError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .connections
            .iter()
            .filter(|c| c.user_id == user_id && c.enabled)
            .cloned()
            .collect())
    }

    async fn delete_connection(&self, id: &str) -> Result<bool, HearthError> {
        let mut inner = self.inner.lock().await;
        let before = inner.connections.len();
        inner.connections.retain(|c| c.id != id);
        Ok(inner.connections.len() != before)
    }

    async fn record_sync(&self, id: &str, sync: &SyncRecord) -> Result<(), HearthError> {
        let mut inner = self.inner.lock().await;
        if let Some(connection) = inner.connections.iter_mut().find(|c| c.id == id) {
            connection.apply_sync(sync);
        }
        Ok(())
    }

    async fn users_with_enabled_connections(&self) -> Result<Vec<String>, HearthError> {
        let inner = self.inner.lock().await;
        if inner.fail_user_listing {
            return Err(injected("user listing"));
        }
        let mut users: Vec<String> = Vec::new();
        for connection in inner.connections.iter().filter(|c| c.enabled) {
            if !users.contains(&connection.user_id) {
                users.push(connection.user_id.clone());
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save_session(&self, session: &ChatSession) -> Result<(), HearthError> {
        let mut inner = self.inner.lock().await;
        inner.session_saves += 1;
        inner.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: &str) -> Result<Option<ChatSession>, HearthError> {
        Ok(self.inner.lock().await.sessions.get(id).cloned())
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, HearthError> {
        let inner = self.inner.lock().await;
        let mut sessions: Vec<&ChatSession> = inner
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions
            .into_iter()
            .map(|s| SessionSummary {
                id: s.id.clone(),
                title: s.title.clone(),
                message_count: s.messages.len(),
                created_at: s.created_at,
                updated_at: s.updated_at,
            })
            .collect())
    }

    async fn delete_session(&self, id: &str) -> Result<bool, HearthError> {
        Ok(self.inner.lock().await.sessions.remove(id).is_some())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn upsert_snapshot(&self, snapshot: &DashboardSnapshot) -> Result<(), HearthError> {
        let mut inner = self.inner.lock().await;
        if inner.fail_snapshot_users.contains(&snapshot.user_id) {
            return Err(injected("snapshot write"));
        }
        inner
            .snapshots
            .insert(snapshot.user_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn get_snapshot(&self, user_id: &str) -> Result<Option<DashboardSnapshot>, HearthError> {
        Ok(self.inner.lock().await.snapshots.get(user_id).cloned())
    }
}

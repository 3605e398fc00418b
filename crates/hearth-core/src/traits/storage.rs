// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for connections, chat sessions, and dashboard snapshots.
//!
//! Every write is a whole-record replace; concurrent writers to the same
//! record resolve as last write wins.

use async_trait::async_trait;

use crate::error::HearthError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatSession, Connection, DashboardSnapshot, SessionSummary, SyncRecord};

/// Lifecycle of a storage backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), HearthError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), HearthError>;
}

#[async_trait]
pub trait ConnectionStore: Send + Sync {
    async fn insert_connection(&self, connection: &Connection) -> Result<(), HearthError>;

    /// Replaces every mutable field of an existing connection.
    async fn update_connection(&self, connection: &Connection) -> Result<(), HearthError>;

    async fn get_connection(&self, id: &str) -> Result<Option<Connection>, HearthError>;

    /// All of a user's connections, oldest first.
    async fn list_connections(&self, user_id: &str) -> Result<Vec<Connection>, HearthError>;

    /// A user's enabled connections, oldest first.
    async fn list_enabled_connections(&self, user_id: &str)
    -> Result<Vec<Connection>, HearthError>;

    /// Returns `true` if a row was removed.
    async fn delete_connection(&self, id: &str) -> Result<bool, HearthError>;

    /// Writes last-sync bookkeeping without touching other fields.
    async fn record_sync(&self, id: &str, sync: &SyncRecord) -> Result<(), HearthError>;

    /// Distinct users owning at least one enabled connection.
    async fn users_with_enabled_connections(&self) -> Result<Vec<String>, HearthError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts or fully replaces a session and its transcript.
    async fn save_session(&self, session: &ChatSession) -> Result<(), HearthError>;

    async fn get_session(&self, id: &str) -> Result<Option<ChatSession>, HearthError>;

    /// A user's sessions, most recently updated first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, HearthError>;

    /// Returns `true` if a row was removed.
    async fn delete_session(&self, id: &str) -> Result<bool, HearthError>;
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replaces the user's snapshot, creating it on first write.
    async fn upsert_snapshot(&self, snapshot: &DashboardSnapshot) -> Result<(), HearthError>;

    async fn get_snapshot(&self, user_id: &str) -> Result<Option<DashboardSnapshot>, HearthError>;
}

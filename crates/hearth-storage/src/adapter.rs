// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use hearth_config::model::StorageConfig;
use hearth_core::{
    AdapterType, ChatSession, Connection, ConnectionStore, DashboardSnapshot, HealthStatus,
    HearthError, PluginAdapter, SessionStore, SessionSummary, SnapshotStore, StorageAdapter,
    SyncRecord,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened by [`StorageAdapter::initialize`]; every store
/// method fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, HearthError> {
        self.db.get().ok_or_else(|| HearthError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HearthError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HearthError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HearthError> {
        self.db()?.checkpoint().await
    }
}

#[async_trait]
impl ConnectionStore for SqliteStorage {
    async fn insert_connection(&self, connection: &Connection) -> Result<(), HearthError> {
        queries::connections::insert_connection(self.db()?, connection).await
    }

    async fn update_connection(&self, connection: &Connection) -> Result<(), HearthError> {
        queries::connections::update_connection(self.db()?, connection).await
    }

    async fn get_connection(&self, id: &str) -> Result<Option<Connection>, HearthError> {
        queries::connections::get_connection(self.db()?, id).await
    }

    async fn list_connections(&self, user_id: &str) -> Result<Vec<Connection>, HearthError> {
        queries::connections::list_connections(self.db()?, user_id, false).await
    }

    async fn list_enabled_connections(
        &self,
        user_id: &str,
    ) -> Result<Vec<Connection>, HearthError> {
        queries::connections::list_connections(self.db()?, user_id, true).await
    }

    async fn delete_connection(&self, id: &str) -> Result<bool, HearthError> {
        queries::connections::delete_connection(self.db()?, id).await
    }

    async fn record_sync(&self, id: &str, sync: &SyncRecord) -> Result<(), HearthError> {
        queries::connections::record_sync(self.db()?, id, sync).await
    }

    async fn users_with_enabled_connections(&self) -> Result<Vec<String>, HearthError> {
        queries::connections::users_with_enabled_connections(self.db()?).await
    }
}

#[async_trait]
impl SessionStore for SqliteStorage {
    async fn save_session(&self, session: &ChatSession) -> Result<(), HearthError> {
        queries::sessions::save_session(self.db()?, session).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<ChatSession>, HearthError> {
        queries::sessions::get_session(self.db()?, id).await
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, HearthError> {
        queries::sessions::list_sessions(self.db()?, user_id).await
    }

    async fn delete_session(&self, id: &str) -> Result<bool, HearthError> {
        queries::sessions::delete_session(self.db()?, id).await
    }
}

#[async_trait]
impl SnapshotStore for SqliteStorage {
    async fn upsert_snapshot(&self, snapshot: &DashboardSnapshot) -> Result<(), HearthError> {
        queries::snapshots::upsert_snapshot(self.db()?, snapshot).await
    }

    async fn get_snapshot(&self, user_id: &str) -> Result<Option<DashboardSnapshot>, HearthError> {
        queries::snapshots::get_snapshot(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn identifies_as_sqlite_storage() {
        let storage = SqliteStorage::new(make_config("unused.db"));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_requires_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn store_calls_fail_before_initialize() {
        let storage = SqliteStorage::new(make_config("never-opened.db"));
        let err = storage.list_connections("u1").await.unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }

    #[tokio::test]
    async fn shutdown_without_initialize_is_a_noop() {
        let storage = SqliteStorage::new(make_config("never-opened.db"));
        storage.shutdown().await.unwrap();
    }
}

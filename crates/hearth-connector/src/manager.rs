// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing connection CRUD.
//!
//! Every lookup is scoped to the calling user: a connection owned by someone
//! else is reported as not found.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use hearth_core::{AuthType, Connection, ConnectionStore, Endpoint, HearthError};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::hub::{ConnectorHub, TestOutcome};
use crate::presets::preset_endpoints;

/// Input for [`ConnectionManager::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewConnection {
    pub service_type: String,
    pub display_name: String,
    pub base_url: String,
    #[serde(default)]
    pub frontend_url: Option<String>,
    #[serde(default)]
    pub auth_type: AuthType,
    /// Plaintext credential object; encrypted before it is stored.
    pub credentials: Value,
    /// Empty means "use the preset for `service_type`".
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Partial update for [`ConnectionManager::update`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionUpdate {
    pub display_name: Option<String>,
    pub base_url: Option<String>,
    pub frontend_url: Option<String>,
    pub auth_type: Option<AuthType>,
    pub credentials: Option<Value>,
    pub endpoints: Option<Vec<Endpoint>>,
    pub enabled: Option<bool>,
}

pub struct ConnectionManager {
    store: Arc<dyn ConnectionStore>,
    hub: Arc<ConnectorHub>,
}

impl ConnectionManager {
    pub fn new(store: Arc<dyn ConnectionStore>, hub: Arc<ConnectorHub>) -> Self {
        Self { store, hub }
    }

    /// Creates an enabled connection for `user_id` and returns it.
    pub async fn create(
        &self,
        user_id: &str,
        new: NewConnection,
    ) -> Result<Connection, HearthError> {
        let base_url = normalize_base_url(&new.base_url)?;
        let endpoints = if new.endpoints.is_empty() {
            preset_endpoints(&new.service_type)
        } else {
            new.endpoints
        };
        check_endpoint_names(&endpoints)?;

        let now = Utc::now();
        let connection = Connection {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            service_type: new.service_type,
            display_name: new.display_name,
            base_url,
            frontend_url: new.frontend_url,
            auth_type: new.auth_type,
            encrypted_credentials: self.hub.vault().encrypt_json(&new.credentials)?,
            endpoints,
            enabled: true,
            last_sync_at: None,
            last_sync_status: None,
            last_sync_error: None,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_connection(&connection).await?;
        info!(
            connection_id = connection.id,
            service_type = connection.service_type,
            endpoints = connection.endpoints.len(),
            "connection created"
        );
        Ok(connection)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Connection>, HearthError> {
        self.store.list_connections(user_id).await
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Connection, HearthError> {
        match self.store.get_connection(id).await? {
            Some(connection) if connection.user_id == user_id => Ok(connection),
            _ => Err(HearthError::NotFound {
                entity: "connection",
                id: id.to_string(),
            }),
        }
    }

    /// Applies a partial update. New credentials are re-encrypted.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        update: ConnectionUpdate,
    ) -> Result<Connection, HearthError> {
        let mut connection = self.get(user_id, id).await?;

        if let Some(display_name) = update.display_name {
            connection.display_name = display_name;
        }
        if let Some(base_url) = update.base_url {
            connection.base_url = normalize_base_url(&base_url)?;
        }
        if let Some(frontend_url) = update.frontend_url {
            connection.frontend_url = Some(frontend_url).filter(|url| !url.is_empty());
        }
        if let Some(auth_type) = update.auth_type {
            connection.auth_type = auth_type;
        }
        if let Some(credentials) = update.credentials {
            connection.encrypted_credentials = self.hub.vault().encrypt_json(&credentials)?;
        }
        if let Some(endpoints) = update.endpoints {
            check_endpoint_names(&endpoints)?;
            connection.endpoints = endpoints;
        }
        if let Some(enabled) = update.enabled {
            connection.enabled = enabled;
        }
        connection.updated_at = Utc::now();

        self.store.update_connection(&connection).await?;
        info!(connection_id = id, "connection updated");
        Ok(connection)
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), HearthError> {
        self.get(user_id, id).await?;
        self.store.delete_connection(id).await?;
        info!(connection_id = id, "connection deleted");
        Ok(())
    }

    /// Runs a connection test. Only ownership lookup can fail.
    pub async fn test(&self, user_id: &str, id: &str) -> Result<TestOutcome, HearthError> {
        let connection = self.get(user_id, id).await?;
        Ok(self.hub.test(&connection).await)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, HearthError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(HearthError::Validation(format!(
            "base_url must start with http:// or https://, got `{raw}`"
        )));
    }
    Ok(trimmed.to_string())
}

fn check_endpoint_names(endpoints: &[Endpoint]) -> Result<(), HearthError> {
    let mut seen = HashSet::new();
    for endpoint in endpoints {
        if endpoint.name.is_empty() {
            return Err(HearthError::Validation("endpoint name is empty".into()));
        }
        if !seen.insert(endpoint.name.as_str()) {
            return Err(HearthError::Validation(format!(
                "duplicate endpoint name `{}`",
                endpoint.name
            )));
        }
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for connections, vaults, and configuration used across tests.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use hearth_config::model::HearthConfig;
use hearth_core::types::{AuthType, Connection, Endpoint};
use hearth_vault::CredentialVault;

/// Fixed test key so tokens are stable within a test run.
pub const TEST_KEY: [u8; 32] = [7u8; 32];

pub fn test_vault() -> Arc<CredentialVault> {
    Arc::new(CredentialVault::new(TEST_KEY))
}

/// Default config with a short connector timeout and fast scheduler.
pub fn test_config() -> HearthConfig {
    let mut config = HearthConfig::default();
    config.connector.timeout_secs = 2;
    config.aggregation.interval_secs = 1;
    config.aggregation.backoff_secs = 1;
    config.anthropic.api_key = Some("test-key".to_string());
    config
}

/// Builder for a stored [`Connection`] with encrypted credentials.
#[derive(Debug, Clone)]
pub struct ConnectionFixture {
    id: String,
    user_id: String,
    service_type: String,
    display_name: String,
    base_url: String,
    frontend_url: Option<String>,
    auth_type: AuthType,
    credentials: Value,
    endpoints: Vec<Endpoint>,
    enabled: bool,
}

impl ConnectionFixture {
    /// A `track` connection using a static key and a single `tasks` endpoint.
    pub fn new(user_id: &str, base_url: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            service_type: "track".to_string(),
            display_name: "Track".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            frontend_url: None,
            auth_type: AuthType::StaticKey,
            credentials: json!({"api_key": "test-token"}),
            endpoints: vec![Endpoint::get("tasks", "/api/tasks", Some("Tasks"))],
            enabled: true,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn service(mut self, service_type: &str, display_name: &str) -> Self {
        self.service_type = service_type.to_string();
        self.display_name = display_name.to_string();
        self
    }

    pub fn frontend_url(mut self, url: &str) -> Self {
        self.frontend_url = Some(url.to_string());
        self
    }

    pub fn auth(mut self, auth_type: AuthType, credentials: Value) -> Self {
        self.auth_type = auth_type;
        self.credentials = credentials;
        self
    }

    pub fn endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Encrypts the credentials under `vault` and produces the connection.
    ///
    /// Panics if encryption fails; test-only.
    pub fn build(self, vault: &CredentialVault) -> Connection {
        let now = Utc::now();
        Connection {
            id: self.id,
            user_id: self.user_id,
            service_type: self.service_type,
            display_name: self.display_name,
            base_url: self.base_url,
            frontend_url: self.frontend_url,
            auth_type: self.auth_type,
            encrypted_credentials: vault
                .encrypt_json(&self.credentials)
                .expect("test vault encrypts"),
            endpoints: self.endpoints,
            enabled: self.enabled,
            last_sync_at: None,
            last_sync_status: None,
            last_sync_error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

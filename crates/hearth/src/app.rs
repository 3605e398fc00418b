// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Component wiring shared by every command that touches storage.

use std::sync::Arc;

use hearth_agent::AgentLoop;
use hearth_aggregate::AggregationEngine;
use hearth_anthropic::AnthropicProvider;
use hearth_config::model::HearthConfig;
use hearth_connector::{ConnectionManager, ConnectorClient, ConnectorHub};
use hearth_core::{HearthError, ProviderAdapter, StorageAdapter};
use hearth_storage::SqliteStorage;
use hearth_vault::CredentialVault;
use tracing::{info, warn};

/// Every long-lived component, built once from the loaded configuration.
pub struct App {
    pub storage: Arc<SqliteStorage>,
    pub connections: ConnectionManager,
    pub agent: AgentLoop,
    pub engine: Arc<AggregationEngine>,
}

impl App {
    /// Opens storage and builds the vault, connectors, agent, and engine.
    ///
    /// A missing model API key is not fatal: the agent is left unconfigured.
    pub async fn open(config: &HearthConfig) -> Result<Self, HearthError> {
        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        let vault = Arc::new(CredentialVault::from_config(&config.vault)?);
        let hub = Arc::new(ConnectorHub::new(
            ConnectorClient::new(&config.connector)?,
            vault,
        ));

        let provider: Option<Arc<dyn ProviderAdapter>> =
            match AnthropicProvider::new(&config.anthropic) {
                Ok(provider) => Some(Arc::new(provider)),
                Err(e) => {
                    warn!(error = %e, "model provider unavailable, chat is disabled");
                    None
                }
            };

        let connections = ConnectionManager::new(storage.clone(), hub.clone());
        let agent = AgentLoop::new(
            config,
            provider,
            storage.clone(),
            storage.clone(),
            hub.clone(),
        )
        .await;
        let engine = Arc::new(AggregationEngine::new(
            storage.clone(),
            storage.clone(),
            hub,
        ));

        info!(
            database = config.storage.database_path.as_str(),
            "hearth components ready"
        );
        Ok(Self {
            storage,
            connections,
            agent,
            engine,
        })
    }

    /// Flushes storage.
    pub async fn close(&self) -> Result<(), HearthError> {
        self.storage.close().await
    }
}

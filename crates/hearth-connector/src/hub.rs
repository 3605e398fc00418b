// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection-level operations: decrypt credentials, authenticate, call.

use std::sync::Arc;

use hearth_core::{Connection, Endpoint, HearthError};
use hearth_vault::CredentialVault;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{ConnectorClient, EndpointResult};

/// Result of probing a connection from the settings surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub success: bool,
    pub message: String,
}

/// Binds the shared [`ConnectorClient`] to the credential vault.
///
/// Every operation authenticates afresh; tokens are never cached.
#[derive(Debug, Clone)]
pub struct ConnectorHub {
    client: ConnectorClient,
    vault: Arc<CredentialVault>,
}

impl ConnectorHub {
    pub fn new(client: ConnectorClient, vault: Arc<CredentialVault>) -> Self {
        Self { client, vault }
    }

    pub fn client(&self) -> &ConnectorClient {
        &self.client
    }

    pub fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    /// Decrypts the connection's credentials and obtains a token.
    pub async fn authenticate(
        &self,
        connection: &Connection,
    ) -> Result<Option<String>, HearthError> {
        let credentials = self.vault.decrypt_json(&connection.encrypted_credentials)?;
        debug!(
            connection_id = connection.id,
            auth_type = %connection.auth_type,
            "authenticating connection"
        );
        self.client
            .authenticate(&connection.base_url, connection.auth_type, &credentials)
            .await
    }

    /// Authenticates, then fetches a single endpoint's data.
    pub async fn fetch(
        &self,
        connection: &Connection,
        endpoint: &Endpoint,
    ) -> Result<Value, HearthError> {
        let token = self.authenticate(connection).await?;
        self.client
            .fetch_endpoint(&connection.base_url, token.as_deref(), endpoint)
            .await
            .map(|fetched| fetched.data)
    }

    /// Authenticates once, then fetches all of the connection's endpoints.
    ///
    /// Only an authentication or decryption failure fails the whole call;
    /// endpoint failures are reported inside the results.
    pub async fn fetch_all(
        &self,
        connection: &Connection,
    ) -> Result<Vec<EndpointResult>, HearthError> {
        let token = self.authenticate(connection).await?;
        Ok(self
            .client
            .fetch_all(&connection.base_url, token.as_deref(), &connection.endpoints)
            .await)
    }

    /// Authenticates and probes the health path.
    ///
    /// Never errors: authentication and decryption failures come back as an
    /// unsuccessful outcome carrying the error text.
    pub async fn test(&self, connection: &Connection) -> TestOutcome {
        let outcome = match self.authenticate(connection).await {
            Ok(token) => {
                if self
                    .client
                    .test_connection(&connection.base_url, token.as_deref())
                    .await
                {
                    TestOutcome {
                        success: true,
                        message: "Connection successful".to_string(),
                    }
                } else {
                    TestOutcome {
                        success: false,
                        message: "Service unreachable".to_string(),
                    }
                }
            }
            Err(e) => TestOutcome {
                success: false,
                message: e.to_string(),
            },
        };
        info!(
            connection_id = connection.id,
            success = outcome.success,
            "connection test finished"
        );
        outcome
    }
}

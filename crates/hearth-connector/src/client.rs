// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for connected household services.
//!
//! Provides [`ConnectorClient`] which handles authentication, health probes,
//! and endpoint fetches against a service's base URL. One client is shared by
//! every connection; it holds no per-service state.

use std::time::Duration;

use futures::future::join_all;
use hearth_config::model::ConnectorConfig;
use hearth_core::{AuthType, Endpoint, HearthError};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth;

/// A successful endpoint fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointData {
    pub name: String,
    pub label: String,
    pub data: Value,
}

/// One entry of a [`ConnectorClient::fetch_all`] batch.
///
/// `outcome` carries the decoded body or the error text, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResult {
    pub name: String,
    pub label: String,
    pub outcome: Result<Value, String>,
}

impl EndpointResult {
    pub fn data(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

/// Stateless REST client used for every connection.
#[derive(Debug, Clone)]
pub struct ConnectorClient {
    http: reqwest::Client,
    timeout: Duration,
    login_path: String,
    health_path: String,
}

impl ConnectorClient {
    /// Creates a client with the configured timeout and auth/health paths.
    pub fn new(config: &ConnectorConfig) -> Result<Self, HearthError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HearthError::Connection {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            timeout,
            login_path: config.login_path.clone(),
            health_path: config.health_path.clone(),
        })
    }

    /// Obtains a bearer token for the service at `base_url`.
    ///
    /// Returns `Ok(None)` for services that need no authentication.
    pub async fn authenticate(
        &self,
        base_url: &str,
        auth_type: AuthType,
        credentials: &Value,
    ) -> Result<Option<String>, HearthError> {
        let login_url = join_url(base_url, &self.login_path);
        auth::acquire_token(&self.http, &login_url, auth_type, credentials).await
    }

    /// Probes the health path. `true` only on HTTP 200; never errors.
    pub async fn test_connection(&self, base_url: &str, token: Option<&str>) -> bool {
        let url = join_url(base_url, &self.health_path);
        let mut request = self.http.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        match request.send().await {
            Ok(response) => {
                debug!(url, status = %response.status(), "health probe answered");
                response.status() == reqwest::StatusCode::OK
            }
            Err(e) => {
                debug!(url, error = %e, "health probe failed");
                false
            }
        }
    }

    /// Calls one endpoint and decodes its JSON body.
    pub async fn fetch_endpoint(
        &self,
        base_url: &str,
        token: Option<&str>,
        endpoint: &Endpoint,
    ) -> Result<EndpointData, HearthError> {
        let method = Method::from_bytes(endpoint.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| {
                HearthError::connection(format!("unsupported HTTP method `{}`", endpoint.method))
            })?;
        let url = join_url(base_url, &endpoint.path);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HearthError::Timeout {
                    duration: self.timeout,
                }
            } else {
                HearthError::Connection {
                    message: format!("{method} {url} failed: {e}"),
                    source: Some(Box::new(e)),
                }
            }
        })?;

        let status = response.status();
        debug!(endpoint = endpoint.name, %status, "endpoint response received");
        if !status.is_success() {
            return Err(HearthError::connection(format!(
                "{method} {url} returned HTTP {}",
                status.as_u16()
            )));
        }

        let data: Value = response.json().await.map_err(|e| HearthError::Connection {
            message: format!("{method} {url} returned invalid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(EndpointData {
            name: endpoint.name.clone(),
            label: endpoint.label().to_string(),
            data,
        })
    }

    /// Fetches every endpoint, isolating failures per endpoint.
    ///
    /// Results are returned in the same order as `endpoints`.
    pub async fn fetch_all(
        &self,
        base_url: &str,
        token: Option<&str>,
        endpoints: &[Endpoint],
    ) -> Vec<EndpointResult> {
        let fetches = endpoints.iter().map(|endpoint| async move {
            let outcome = match self.fetch_endpoint(base_url, token, endpoint).await {
                Ok(fetched) => Ok(fetched.data),
                Err(e) => {
                    warn!(endpoint = endpoint.name, error = %e, "endpoint fetch failed");
                    Err(e.to_string())
                }
            };
            EndpointResult {
                name: endpoint.name.clone(),
                label: endpoint.label().to_string(),
                outcome,
            }
        });
        join_all(fetches).await
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

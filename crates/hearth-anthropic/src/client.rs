// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! One POST per completion, with a single delayed retry when Anthropic
//! reports a transient status.

use std::time::Duration;

use hearth_core::HearthError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Anthropic API client.
///
/// Retries once, after one second, on 429, 500, 503 and 529.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

fn provider_error(message: String, source: Option<reqwest::Error>) -> HearthError {
    HearthError::ModelProvider {
        message,
        source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

impl AnthropicClient {
    /// Creates a client sending `x-api-key` and `anthropic-version` on every request.
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, HearthError> {
        let mut defaults = HeaderMap::new();
        defaults.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| HearthError::Config(format!("invalid API key header value: {e}")))?,
        );
        defaults.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                HearthError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        defaults.insert("content-type", HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(defaults)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| provider_error(format!("failed to build HTTP client: {e}"), Some(e)))?;

        Ok(Self {
            client: http,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Points the client at another endpoint (wiremock in tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a request and returns the full response.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, HearthError> {
        let mut retries = 0;
        loop {
            match self.send_once(request).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Transient { status, body } if retries < self.max_retries => {
                    retries += 1;
                    warn!(%status, retries, "transient Anthropic error, retrying");
                    debug!(body = %body, "transient error body");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Attempt::Transient { status, body } | Attempt::Rejected { status, body } => {
                    return Err(provider_error(describe_failure(status, &body), None));
                }
            }
        }
    }

    async fn send_once(&self, request: &MessageRequest) -> Result<Attempt, HearthError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| provider_error(format!("request to Anthropic failed: {e}"), Some(e)))?;

        let status = response.status();
        debug!(%status, "Anthropic response received");
        let body = response.text().await.map_err(|e| {
            provider_error(format!("could not read Anthropic response: {e}"), Some(e))
        })?;

        if status.is_success() {
            let parsed = serde_json::from_str(&body).map_err(|e| HearthError::ModelProvider {
                message: format!("unexpected Anthropic response shape: {e}"),
                source: Some(Box::new(e)),
            })?;
            return Ok(Attempt::Done(parsed));
        }
        if matches!(status.as_u16(), 429 | 500 | 503 | 529) {
            Ok(Attempt::Transient { status, body })
        } else {
            Ok(Attempt::Rejected { status, body })
        }
    }
}

enum Attempt {
    Done(MessageResponse),
    Transient { status: StatusCode, body: String },
    Rejected { status: StatusCode, body: String },
}

/// Prefers the API's own error type and message over the raw body.
fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api) => format!("Anthropic API error ({}): {}", api.error.type_, api.error.message),
        Err(_) => format!("Anthropic returned {status}: {body}"),
    }
}

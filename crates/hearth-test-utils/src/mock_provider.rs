// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic agent tests.
//!
//! `MockProvider` implements `ProviderAdapter` with a scripted queue of
//! replies and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use hearth_core::traits::adapter::PluginAdapter;
use hearth_core::traits::provider::ProviderAdapter;
use hearth_core::types::{
    AdapterType, ContentBlock, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use hearth_core::HearthError;

type Reply = Result<ProviderResponse, HearthError>;

/// A mock provider that replays queued responses in FIFO order.
///
/// When the queue is empty a plain `"mock response"` text reply is returned.
#[derive(Clone, Default)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a final text reply (`stop_reason = "end_turn"`).
    pub async fn push_text(&self, text: &str) {
        self.replies
            .lock()
            .await
            .push_back(Ok(text_response(text)));
    }

    /// Queues a reply that requests the given `(id, tool name)` invocations.
    pub async fn push_tool_use(&self, calls: &[(&str, &str)]) {
        let content = calls
            .iter()
            .map(|(id, name)| ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input: Value::Object(Default::default()),
            })
            .collect();
        self.replies
            .lock()
            .await
            .push_back(Ok(response(content, "tool_use")));
    }

    /// Queues a provider failure.
    pub async fn push_error(&self, message: &str) {
        self.replies
            .lock()
            .await
            .push_back(Err(HearthError::model_provider(message)));
    }

    /// Every request received so far, in call order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

/// Builds a final text response.
pub fn text_response(text: &str) -> ProviderResponse {
    response(
        vec![ContentBlock::Text {
            text: text.to_string(),
        }],
        "end_turn",
    )
}

fn response(content: Vec<ContentBlock>, stop_reason: &str) -> ProviderResponse {
    ProviderResponse {
        id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
        content,
        model: "mock-model".to_string(),
        stop_reason: Some(stop_reason.to_string()),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HearthError> {
        self.requests.lock().await.push(request);
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("mock response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "m".into(),
            system_prompt: None,
            messages: Vec::new(),
            max_tokens: 16,
            tools: None,
        }
    }

    #[tokio::test]
    async fn replays_in_order_then_falls_back() {
        let provider = MockProvider::new();
        provider.push_tool_use(&[("tu_1", "track_tasks")]).await;
        provider.push_text("done").await;

        assert!(provider.complete(request()).await.unwrap().requests_tools());
        assert_eq!(
            provider.complete(request()).await.unwrap().text().as_deref(),
            Some("done")
        );
        assert_eq!(
            provider.complete(request()).await.unwrap().text().as_deref(),
            Some("mock response")
        );
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn queued_error_is_returned() {
        let provider = MockProvider::new();
        provider.push_error("overloaded").await;
        assert!(provider.complete(request()).await.is_err());
    }
}

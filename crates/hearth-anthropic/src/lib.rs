// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic provider adapter for the Hearth agent.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API
//! with tool use. Responses are requested whole; there is no streaming.

pub mod client;
pub mod types;

use async_trait::async_trait;
use hearth_config::model::AnthropicConfig;
use hearth_core::error::HearthError;
use hearth_core::traits::{PluginAdapter, ProviderAdapter};
use hearth_core::types::{
    AdapterType, ContentBlock, HealthStatus, MessageContent, ProviderMessage, ProviderRequest,
    ProviderResponse, TokenUsage,
};
use tracing::{debug, info, warn};

use crate::client::AnthropicClient;
use crate::types::{
    ApiContent, ApiContentBlock, ApiMessage, MessageRequest, ResponseContentBlock, ToolDefinition,
};

/// Environment variable consulted when `anthropic.api_key` is unset.
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Anthropic provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config, then `ANTHROPIC_API_KEY`, then error.
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Creates a provider from the `[anthropic]` config section.
    ///
    /// Fails with [`HearthError::Config`] when no API key is available.
    pub fn new(config: &AnthropicConfig) -> Result<Self, HearthError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = AnthropicClient::new(&api_key, &config.api_version)?;

        info!(model = config.default_model, "Anthropic provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    /// Converts a [`ProviderRequest`] to an Anthropic [`MessageRequest`].
    fn to_message_request(request: &ProviderRequest) -> MessageRequest {
        let tools = request
            .tools
            .as_ref()
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| match serde_json::from_value::<ToolDefinition>(v.clone()) {
                        Ok(def) => Some(def),
                        Err(e) => {
                            warn!(error = %e, "dropping malformed tool definition");
                            None
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|defs| !defs.is_empty());

        MessageRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(convert_message).collect(),
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens,
            tools,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        // Probing the API would spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HearthError> {
        let api_request = Self::to_message_request(&request);
        let response = self.client.complete_message(&api_request).await?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(ContentBlock::Text { text }),
                ResponseContentBlock::ToolUse { id, name, input } => {
                    Some(ContentBlock::ToolUse { id, name, input })
                }
                ResponseContentBlock::Unsupported => None,
            })
            .collect();

        Ok(ProviderResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}

fn resolve_api_key(config_key: Option<&str>) -> Result<String, HearthError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.to_string());
    }

    std::env::var(API_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            HearthError::Config(format!(
                "Anthropic API key not found. Set anthropic.api_key in config or {API_KEY_ENV_VAR}."
            ))
        })
}

fn convert_message(message: &ProviderMessage) -> ApiMessage {
    let content = match &message.content {
        MessageContent::Text(text) => ApiContent::Text(text.clone()),
        MessageContent::Blocks(blocks) => {
            ApiContent::Blocks(blocks.iter().map(convert_block).collect())
        }
    };
    ApiMessage {
        role: message.role.to_string(),
        content,
    }
}

fn convert_block(block: &ContentBlock) -> ApiContentBlock {
    match block {
        ContentBlock::Text { text } => ApiContentBlock::Text { text: text.clone() },
        ContentBlock::ToolUse { id, name, input } => ApiContentBlock::ToolUse {
            id: id.clone(),
            name: name.clone(),
            input: input.clone(),
        },
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => ApiContentBlock::ToolResult {
            tool_use_id: tool_use_id.clone(),
            content: content.clone(),
            is_error: *is_error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::types::ChatRole;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(tools: Option<Vec<serde_json::Value>>) -> ProviderRequest {
        ProviderRequest {
            model: "claude-sonnet-4-5-20250929".into(),
            system_prompt: Some("You help.".into()),
            messages: vec![
                ProviderMessage {
                    role: ChatRole::User,
                    content: MessageContent::Text("tasks?".into()),
                },
                ProviderMessage {
                    role: ChatRole::Assistant,
                    content: MessageContent::Blocks(vec![ContentBlock::ToolUse {
                        id: "tu_1".into(),
                        name: "track_tasks".into(),
                        input: json!({}),
                    }]),
                },
                ProviderMessage {
                    role: ChatRole::User,
                    content: MessageContent::Blocks(vec![ContentBlock::ToolResult {
                        tool_use_id: "tu_1".into(),
                        content: "[]".into(),
                        is_error: None,
                    }]),
                },
            ],
            max_tokens: 2048,
            tools,
        }
    }

    #[test]
    fn resolve_api_key_prefers_config() {
        assert_eq!(resolve_api_key(Some("sk-test-123")).unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_empty_config_falls_back_to_env() {
        // Passes whether or not the variable is set in the test environment.
        match resolve_api_key(Some("")) {
            Ok(key) => assert!(!key.is_empty()),
            Err(e) => assert!(e.to_string().contains("API key not found")),
        }
    }

    #[test]
    fn message_request_maps_roles_and_blocks() {
        let req = AnthropicProvider::to_message_request(&request(None));
        assert_eq!(req.system.as_deref(), Some("You help."));
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.messages[1].role, "assistant");
        assert!(matches!(
            &req.messages[2].content,
            ApiContent::Blocks(b) if matches!(&b[0], ApiContentBlock::ToolResult { .. })
        ));
        assert!(req.tools.is_none());
    }

    #[test]
    fn empty_tool_list_is_omitted() {
        let req = AnthropicProvider::to_message_request(&request(Some(Vec::new())));
        assert!(req.tools.is_none());
    }

    #[test]
    fn tool_definitions_pass_through() {
        let req = AnthropicProvider::to_message_request(&request(Some(vec![json!({
            "name": "track_tasks",
            "description": "Fetch Tasks",
            "input_schema": {"type": "object", "properties": {}, "required": []}
        })])));
        let tools = req.tools.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "track_tasks");
    }

    #[test]
    fn plugin_adapter_metadata() {
        let client = AnthropicClient::new("k", "2023-06-01").unwrap();
        let provider = AnthropicProvider::with_client(client);
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
    }

    #[tokio::test]
    async fn complete_maps_tool_use_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"tools": [{"name": "track_tasks"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_tool",
                "type": "message",
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Checking."},
                    {"type": "tool_use", "id": "tu_2", "name": "track_tasks", "input": {}}
                ],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 30, "output_tokens": 12}
            })))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("k", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let provider = AnthropicProvider::with_client(client);
        let response = provider
            .complete(request(Some(vec![json!({
                "name": "track_tasks",
                "description": "Fetch Tasks",
                "input_schema": {"type": "object", "properties": {}, "required": []}
            })])))
            .await
            .unwrap();

        assert!(response.requests_tools());
        assert_eq!(response.text().as_deref(), Some("Checking."));
        assert_eq!(response.usage.output_tokens, 12);
        assert!(matches!(
            &response.content[1],
            ContentBlock::ToolUse { id, .. } if id == "tu_2"
        ));
    }
}

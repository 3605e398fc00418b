// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and provider types shared across the Hearth workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

// --- Connections ---

/// How a connection obtains a bearer token from its service.
///
/// Stored and configured by tag: `jwt_password`, `jwt_json`, `api_key`.
/// Any other tag means the service is called without authentication.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum AuthType {
    /// Form-encoded `username`/`password` POSTed to the login path.
    #[default]
    #[strum(serialize = "jwt_password")]
    #[serde(rename = "jwt_password")]
    FormGrant,
    /// The credential object POSTed as JSON to the login path.
    #[strum(serialize = "jwt_json")]
    #[serde(rename = "jwt_json")]
    JsonGrant,
    /// The credential object's `api_key` is the token; no network call.
    #[strum(serialize = "api_key")]
    #[serde(rename = "api_key")]
    StaticKey,
    /// No authentication.
    #[strum(serialize = "none")]
    #[serde(rename = "none", other)]
    None,
}

impl AuthType {
    /// Parses an auth tag, treating anything unrecognized as [`AuthType::None`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(AuthType::None)
    }
}

/// One named, addressable data-fetching operation on a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Unique within its connection.
    pub name: String,
    /// Path appended to the connection's base URL, including any query string.
    pub path: String,
    /// HTTP method, `GET` unless configured otherwise.
    #[serde(default = "default_method")]
    pub method: String,
    /// Label shown on the dashboard and in tool descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_label: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Endpoint {
    /// Creates a `GET` endpoint with an optional dashboard label.
    pub fn get(name: &str, path: &str, label: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            method: default_method(),
            dashboard_label: label.map(str::to_string),
        }
    }

    /// The dashboard label, falling back to the endpoint name.
    pub fn label(&self) -> &str {
        self.dashboard_label.as_deref().unwrap_or(&self.name)
    }
}

/// Outcome of the last aggregation pass over a connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
}

/// Sync bookkeeping written back onto a connection after each refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub at: DateTime<Utc>,
    pub status: SyncStatus,
    pub error: Option<String>,
}

/// A user's configured link to one third-party REST service.
///
/// `encrypted_credentials` is a vault token; plaintext credentials never
/// live on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub user_id: String,
    /// Free-form service tag (`track`, `calendar`, ...).
    pub service_type: String,
    pub display_name: String,
    /// Stored without a trailing slash.
    pub base_url: String,
    pub frontend_url: Option<String>,
    pub auth_type: AuthType,
    pub encrypted_credentials: String,
    pub endpoints: Vec<Endpoint>,
    pub enabled: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_sync_status: Option<SyncStatus>,
    pub last_sync_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    /// Looks up one of this connection's endpoints by name.
    pub fn endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Applies a sync record to the in-memory copy.
    pub fn apply_sync(&mut self, sync: &SyncRecord) {
        self.last_sync_at = Some(sync.at);
        self.last_sync_status = Some(sync.status);
        self.last_sync_error = sync.error.clone();
    }
}

// --- Chat ---

/// Author of a chat or provider message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A typed content block exchanged with the model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Message content: plain text or structured blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Text view of the content; structured blocks contribute their text parts.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// One entry of an assistant turn's tool-call log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub input: serde_json::Value,
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
    /// Present only on assistant messages produced after at least one tool round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Text(text.into()),
            timestamp: Utc::now(),
            tool_calls: None,
        }
    }

    /// An assistant message; an empty tool-call log is stored as `None`.
    pub fn assistant(text: impl Into<String>, tool_calls: Vec<ToolCallRecord>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: MessageContent::Text(text.into()),
            timestamp: Utc::now(),
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
        }
    }
}

/// A conversation owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row for a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Dashboard ---

/// One unit of fetched data on the dashboard, or the error in its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub service_type: String,
    pub service_name: String,
    pub frontend_url: Option<String>,
    pub endpoint_name: String,
    pub label: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

/// The complete, replaceable set of widgets for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub user_id: String,
    pub widgets: Vec<Widget>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub refresh_errors: Vec<String>,
}

impl DashboardSnapshot {
    /// A snapshot for a user that has never been refreshed.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            widgets: Vec::new(),
            last_refreshed_at: None,
            refresh_errors: Vec::new(),
        }
    }
}

// --- Provider ---

/// A single message in provider wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

/// A request to a model provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
    /// `{name, description, input_schema}` objects; `None` omits the parameter.
    pub tools: Option<Vec<serde_json::Value>>,
}

/// Token usage for one provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A full, non-streamed response from a model provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

impl ProviderResponse {
    /// True when the model stopped to request tool invocations.
    pub fn requests_tools(&self) -> bool {
        self.stop_reason.as_deref() == Some("tool_use")
    }

    /// Text blocks joined by newlines, or `None` if the response has no text.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hearth services hub.
//!
//! Unknown keys are rejected in every section, so a typo in `hearth.toml`
//! fails at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Hearth configuration.
///
/// Constructed once at startup and handed to every component that needs it.
/// Every section may be omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HearthConfig {
    /// Agent identity and conversation behavior.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Model provider used by the chat agent.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Where connections, sessions and snapshots live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key for connection credentials at rest.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Outbound REST connector settings.
    #[serde(default)]
    pub connector: ConnectorConfig,

    /// Dashboard aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

/// Agent identity and conversation behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the hub.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Replaces the built-in household prompt. `system_prompt_file` wins if both are set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// File whose trimmed contents become the system prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Maximum tool rounds within a single conversation turn.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

fn default_agent_name() -> String {
    "hearth".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_tool_rounds() -> usize {
    10
}

/// Model provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for agent turns.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Output token cap for each model call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sent as the `anthropic-version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// SQLite persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Created, with parent directories, on first start.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Open the database in WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("hearth").join("hearth.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("hearth.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Credential encryption.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Base64-encoded 32-byte key. `None` falls back to `HEARTH_ENCRYPTION_KEY`.
    #[serde(default)]
    pub encryption_key: Option<String>,
}

/// Outbound REST connector settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Login path shared by the form and JSON grant strategies.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Health probe path used by connection tests.
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            login_path: default_login_path(),
            health_path: default_health_path(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

/// Dashboard aggregation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationConfig {
    /// Run the background scheduler under `hearth serve`.
    #[serde(default = "default_aggregation_enabled")]
    pub enabled: bool,

    /// Seconds between scheduler ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Seconds to back off after a tick-level failure.
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            enabled: default_aggregation_enabled(),
            interval_secs: default_interval_secs(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

fn default_aggregation_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    300
}

fn default_backoff_secs() -> u64 {
    60
}

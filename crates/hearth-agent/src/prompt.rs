// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt resolution.

use hearth_config::model::AgentConfig;
use tracing::{info, warn};

/// Built-in prompt used when neither a file nor an inline prompt is configured.
pub const HOUSEHOLD_PROMPT: &str = "You are a helpful household management assistant. \
You have access to the user's connected services and can fetch data from them using tools. \
Be concise and helpful. When presenting data, format it clearly. If no services are connected, \
let the user know they can add connections in Settings.";

/// Loads the system prompt following config priority: file > inline > default.
///
/// An unreadable or empty prompt file is logged and skipped.
pub async fn load_system_prompt(config: &AgentConfig) -> String {
    if let Some(path) = &config.system_prompt_file {
        match tokio::fs::read_to_string(path).await {
            Ok(content) if !content.trim().is_empty() => {
                info!(path = path.as_str(), "loaded system prompt from file");
                return content.trim().to_string();
            }
            Ok(_) => warn!(path = path.as_str(), "system prompt file is empty, falling back"),
            Err(e) => warn!(
                path = path.as_str(),
                error = %e,
                "failed to read system prompt file, falling back"
            ),
        }
    }

    match &config.system_prompt {
        Some(prompt) if !prompt.is_empty() => prompt.clone(),
        _ => HOUSEHOLD_PROMPT.to_string(),
    }
}

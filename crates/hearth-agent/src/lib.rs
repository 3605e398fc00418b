// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat agent for the Hearth services hub.
//!
//! The [`AgentLoop`] answers a user's message by letting the model call the
//! user's connected endpoints as tools. One call to [`AgentLoop::chat`] is one
//! conversation turn:
//! - Resolves (or starts) the chat session
//! - Builds the tool registry from the user's enabled connections
//! - Alternates model calls and tool rounds until the model answers in text
//! - Persists the session once, when the turn ends

pub mod prompt;
pub mod session;
pub mod turn;

use std::sync::Arc;

use chrono::Utc;
use hearth_config::model::HearthConfig;
use hearth_connector::ConnectorHub;
use hearth_core::{
    ChatMessage, ChatSession, ConnectionStore, HearthError, ProviderAdapter, SessionStore,
};
use serde::Serialize;
use tracing::{error, info};

pub use prompt::{HOUSEHOLD_PROMPT, load_system_prompt};
pub use turn::TurnState;

/// Reply returned when no provider API key is configured.
pub const NOT_CONFIGURED_REPLY: &str =
    "AI agent is not configured. Please set ANTHROPIC_API_KEY in your environment.";

/// Outcome of one conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// The session the turn was recorded in; `None` when nothing was persisted.
    pub session_id: Option<String>,
    pub message: String,
}

/// Tool-using conversation driver.
pub struct AgentLoop {
    provider: Option<Arc<dyn ProviderAdapter>>,
    connections: Arc<dyn ConnectionStore>,
    sessions: Arc<dyn SessionStore>,
    hub: Arc<ConnectorHub>,
    model: String,
    max_tokens: u32,
    max_tool_rounds: usize,
    system_prompt: String,
}

impl AgentLoop {
    /// Creates an agent. A `None` provider leaves the agent unconfigured.
    pub async fn new(
        config: &HearthConfig,
        provider: Option<Arc<dyn ProviderAdapter>>,
        connections: Arc<dyn ConnectionStore>,
        sessions: Arc<dyn SessionStore>,
        hub: Arc<ConnectorHub>,
    ) -> Self {
        let system_prompt = load_system_prompt(&config.agent).await;
        info!(
            agent_name = config.agent.name.as_str(),
            configured = provider.is_some(),
            "agent loop initialized"
        );
        Self {
            provider,
            connections,
            sessions,
            hub,
            model: config.anthropic.default_model.clone(),
            max_tokens: config.anthropic.max_tokens,
            max_tool_rounds: config.agent.max_tool_rounds,
            system_prompt,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Runs one conversation turn for `user_id`.
    ///
    /// Provider and tool failures never escape: they end the turn with an
    /// apology message that is persisted like any other reply. Only storage
    /// failures while loading or saving the session are returned as errors.
    pub async fn chat(
        &self,
        user_id: &str,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, HearthError> {
        let Some(provider) = &self.provider else {
            return Ok(ChatReply {
                session_id: session_id.map(str::to_string),
                message: NOT_CONFIGURED_REPLY.to_string(),
            });
        };

        let mut session = self.resolve_session(user_id, message, session_id).await?;
        session.messages.push(ChatMessage::user(message));

        let reply = match self.run_turn(provider.as_ref(), user_id, &session).await {
            Ok(outcome) => {
                info!(
                    session_id = session.id.as_str(),
                    tool_calls = outcome.tool_calls.len(),
                    "agent turn complete"
                );
                ChatMessage::assistant(outcome.text, outcome.tool_calls)
            }
            Err(e) => {
                error!(session_id = session.id.as_str(), error = %e, "agent turn failed");
                ChatMessage::assistant(format!("Sorry, I encountered an error: {e}"), Vec::new())
            }
        };

        let text = reply.content.as_text();
        session.messages.push(reply);
        session.updated_at = Utc::now();
        self.sessions.save_session(&session).await?;

        Ok(ChatReply {
            session_id: Some(session.id),
            message: text,
        })
    }

    /// Loads the caller's session, or starts a new one titled from `message`.
    ///
    /// An unknown id, or one owned by another user, silently starts a new session.
    async fn resolve_session(
        &self,
        user_id: &str,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatSession, HearthError> {
        if let Some(id) = session_id {
            match self.sessions.get_session(id).await? {
                Some(existing) if existing.user_id == user_id => return Ok(existing),
                _ => info!(session_id = id, "session not available, starting a new one"),
            }
        }

        let now = Utc::now();
        Ok(ChatSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: session::title_from(message),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tool-use state machine behind a single conversation turn.

use hearth_core::{
    ChatRole, ChatSession, ContentBlock, HearthError, MessageContent, ProviderAdapter,
    ProviderMessage, ProviderRequest, ProviderResponse, ToolCallRecord,
};
use hearth_tools::ToolRegistry;
use tracing::{debug, info};

use crate::AgentLoop;

/// Reply used when the model ends the turn without any text.
pub const EMPTY_REPLY: &str = "I couldn't generate a response.";

/// States of one conversation turn.
#[derive(Debug)]
pub enum TurnState {
    /// Sending the transcript to the model.
    AwaitingModel,
    /// The model asked for tools; running them.
    ToolExecution(ProviderResponse),
    /// The model answered in text.
    Done(String),
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnState::AwaitingModel => write!(f, "awaiting_model"),
            TurnState::ToolExecution(_) => write!(f, "tool_execution"),
            TurnState::Done(_) => write!(f, "done"),
        }
    }
}

/// What a successful turn produced.
#[derive(Debug)]
pub(crate) struct TurnOutcome {
    pub text: String,
    /// Every tool invoked during the turn, across all rounds.
    pub tool_calls: Vec<ToolCallRecord>,
}

impl AgentLoop {
    /// Drives the model until it answers in text.
    ///
    /// Tool rounds live only in the wire transcript; the session itself is
    /// not modified here.
    pub(crate) async fn run_turn(
        &self,
        provider: &dyn ProviderAdapter,
        user_id: &str,
        session: &ChatSession,
    ) -> Result<TurnOutcome, HearthError> {
        let connections = self.connections.list_enabled_connections(user_id).await?;
        let registry = ToolRegistry::build(&connections);
        let tools = (!registry.is_empty()).then(|| registry.tool_definitions());
        debug!(user_id, tool_count = registry.len(), "tool registry built");

        let mut wire: Vec<ProviderMessage> = session
            .messages
            .iter()
            .map(|m| ProviderMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        let mut tool_calls = Vec::new();
        let mut rounds = 0usize;
        let mut state = TurnState::AwaitingModel;

        loop {
            debug!(state = %state, rounds, "turn state");
            state = match state {
                TurnState::AwaitingModel => {
                    let request = ProviderRequest {
                        model: self.model.clone(),
                        system_prompt: Some(self.system_prompt.clone()),
                        messages: wire.clone(),
                        max_tokens: self.max_tokens,
                        tools: tools.clone(),
                    };
                    let response = provider.complete(request).await?;
                    if response.requests_tools() && has_tool_use(&response) {
                        TurnState::ToolExecution(response)
                    } else {
                        let text = response.text().unwrap_or_else(|| EMPTY_REPLY.to_string());
                        TurnState::Done(text)
                    }
                }
                TurnState::ToolExecution(response) => {
                    rounds += 1;
                    if rounds > self.max_tool_rounds {
                        return Err(HearthError::model_provider(format!(
                            "the model requested more than {} tool rounds",
                            self.max_tool_rounds
                        )));
                    }

                    let mut results = Vec::new();
                    for block in &response.content {
                        let ContentBlock::ToolUse { id, name, input } = block else {
                            continue;
                        };
                        tool_calls.push(ToolCallRecord {
                            tool: name.clone(),
                            input: input.clone(),
                        });
                        let output = registry
                            .execute(name, self.connections.as_ref(), &self.hub)
                            .await;
                        results.push(ContentBlock::ToolResult {
                            tool_use_id: id.clone(),
                            content: output.content,
                            is_error: output.is_error.then_some(true),
                        });
                    }
                    info!(tool_count = results.len(), round = rounds, "executed tool calls");

                    wire.push(ProviderMessage {
                        role: ChatRole::Assistant,
                        content: MessageContent::Blocks(response.content),
                    });
                    wire.push(ProviderMessage {
                        role: ChatRole::User,
                        content: MessageContent::Blocks(results),
                    });
                    TurnState::AwaitingModel
                }
                TurnState::Done(text) => return Ok(TurnOutcome { text, tool_calls }),
            };
        }
    }
}

fn has_tool_use(response: &ProviderResponse) -> bool {
    response
        .content
        .iter()
        .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
}

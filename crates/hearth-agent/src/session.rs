// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session operations scoped to the owning user.

use hearth_core::{ChatSession, HearthError, SessionSummary};
use tracing::info;

use crate::AgentLoop;

/// Number of leading characters of the first message used as a session title.
pub const TITLE_CHARS: usize = 50;

/// Session title for a conversation opened with `message`.
pub fn title_from(message: &str) -> String {
    message.chars().take(TITLE_CHARS).collect()
}

impl AgentLoop {
    /// The user's sessions, most recently updated first.
    pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, HearthError> {
        self.sessions.list_sessions(user_id).await
    }

    /// A session with its full transcript; `NotFound` unless `user_id` owns it.
    pub async fn get_session(&self, user_id: &str, id: &str) -> Result<ChatSession, HearthError> {
        match self.sessions.get_session(id).await? {
            Some(session) if session.user_id == user_id => Ok(session),
            _ => Err(HearthError::NotFound {
                entity: "session",
                id: id.to_string(),
            }),
        }
    }

    pub async fn delete_session(&self, user_id: &str, id: &str) -> Result<(), HearthError> {
        let session = self.get_session(user_id, id).await?;
        self.sessions.delete_session(&session.id).await?;
        info!(session_id = id, "session deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_fifty_chars() {
        let long = "a".repeat(80);
        assert_eq!(title_from(&long).len(), 50);
        assert_eq!(title_from("short"), "short");
    }

    #[test]
    fn title_counts_characters_not_bytes() {
        let message = "ü".repeat(60);
        let title = title_from(&message);
        assert_eq!(title.chars().count(), 50);
    }
}

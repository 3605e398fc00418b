// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session and transcript persistence.
//!
//! A save replaces the session row and its entire transcript in one
//! transaction.

use hearth_core::{ChatMessage, ChatRole, ChatSession, HearthError, SessionSummary};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::queries::{json_column, parsed_column};

/// Pre-serialized transcript row.
struct MessageRow {
    role: String,
    content: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    tool_calls: Option<String>,
}

pub async fn save_session(db: &Database, session: &ChatSession) -> Result<(), HearthError> {
    let rows = session
        .messages
        .iter()
        .map(|m| {
            Ok(MessageRow {
                role: m.role.to_string(),
                content: serde_json::to_string(&m.content)?,
                timestamp: m.timestamp,
                tool_calls: m
                    .tool_calls
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            })
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    let id = session.id.clone();
    let user_id = session.user_id.clone();
    let title = session.title.clone();
    let created_at = session.created_at;
    let updated_at = session.updated_at;

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO chat_sessions (id, user_id, title, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET title = excluded.title,
                                               updated_at = excluded.updated_at",
                params![id, user_id, title, created_at, updated_at],
            )?;
            tx.execute("DELETE FROM chat_messages WHERE session_id = ?1", params![id])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO chat_messages (session_id, seq, role, content, timestamp, tool_calls)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for (seq, row) in rows.iter().enumerate() {
                    stmt.execute(params![
                        id,
                        seq as i64,
                        row.role,
                        row.content,
                        row.timestamp,
                        row.tool_calls,
                    ])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_session(db: &Database, id: &str) -> Result<Option<ChatSession>, HearthError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ChatSession>, rusqlite::Error> {
            let header = conn
                .query_row(
                    "SELECT id, user_id, title, created_at, updated_at
                     FROM chat_sessions WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok(ChatSession {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            title: row.get(2)?,
                            messages: Vec::new(),
                            created_at: row.get(3)?,
                            updated_at: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            let Some(mut session) = header else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT role, content, timestamp, tool_calls
                 FROM chat_messages WHERE session_id = ?1 ORDER BY seq",
            )?;
            let messages = stmt.query_map(params![session.id], |row| {
                let tool_calls = match row.get::<_, Option<String>>(3)? {
                    Some(_) => Some(json_column(row, 3)?),
                    None => None,
                };
                Ok(ChatMessage {
                    role: parsed_column::<ChatRole>(row, 0)?,
                    content: json_column(row, 1)?,
                    timestamp: row.get(2)?,
                    tool_calls,
                })
            })?;
            session.messages = messages.collect::<Result<_, _>>()?;
            Ok(Some(session))
        })
        .await
        .map_err(map_tr_err)
}

/// A user's sessions, most recently updated first.
pub async fn list_sessions(
    db: &Database,
    user_id: &str,
) -> Result<Vec<SessionSummary>, HearthError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<SessionSummary>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT s.id, s.title, COUNT(m.seq), s.created_at, s.updated_at
                 FROM chat_sessions s
                 LEFT JOIN chat_messages m ON m.session_id = s.id
                 WHERE s.user_id = ?1
                 GROUP BY s.id
                 ORDER BY s.updated_at DESC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(SessionSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    message_count: row.get::<_, i64>(2)? as usize,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes a session; its transcript goes with it via `ON DELETE CASCADE`.
pub async fn delete_session(db: &Database, id: &str) -> Result<bool, HearthError> {
    let id = id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM chat_sessions WHERE id = ?1", params![id])
        })
        .await
        .map_err(map_tr_err)?;
    Ok(deleted > 0)
}

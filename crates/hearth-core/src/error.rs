// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hearth services hub.

use thiserror::Error;

/// The primary error type used across all Hearth adapters and core operations.
#[derive(Debug, Error)]
pub enum HearthError {
    /// Configuration errors (invalid TOML, missing keys, bad encryption key).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A login call failed, returned non-2xx, or the credential envelope is unusable.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// Transport failure or non-2xx on a data or health call to a connected service.
    #[error("{message}")]
    Connection {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A credential blob could not be decrypted under the current key.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// A tool name is unknown or its bound connection/endpoint no longer exists.
    #[error("{0}")]
    ToolResolution(String),

    /// The conversation model provider failed or returned an unexpected shape.
    #[error("model provider error: {message}")]
    ModelProvider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller-supplied input failed a semantic check.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A record does not exist or is not owned by the caller.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// Shorthand for a [`HearthError::Connection`] without an underlying source.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`HearthError::ModelProvider`] without an underlying source.
    pub fn model_provider(message: impl Into<String>) -> Self {
        Self::ModelProvider {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for HearthError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {e}"))
    }
}

// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rubybot.

use thiserror::Error;

/// The primary error type used across all rubybot adapter traits and core operations.
#[derive(Debug, Error)]
pub enum RubyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (send/edit failures, malformed updates, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Completion backend errors (API failure, quota, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RubyError {
    /// Shorthand for a storage error carrying only a message.
    pub fn storage(message: impl Into<String>) -> Self {
        RubyError::Storage {
            source: message.into().into(),
        }
    }

    /// Shorthand for a provider error carrying only a message.
    pub fn provider(message: impl Into<String>) -> Self {
        RubyError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a channel error carrying only a message.
    pub fn channel(message: impl Into<String>) -> Self {
        RubyError::Channel {
            message: message.into(),
            source: None,
        }
    }
}

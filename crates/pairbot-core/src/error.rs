// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for pairbot.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across collaborator traits and bot operations.
#[derive(Debug, Error)]
pub enum PairbotError {
    /// Configuration errors (invalid TOML, missing required fields, bad cron).
    #[error("configuration error: {0}")]
    Config(String),

    /// Row store errors (SQLite failure, Sheets API failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (gateway connection, HTTP failure, rate limiting).
    #[error("chat platform error: {message}")]
    Chat {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external call did not complete within its deadline.
    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// A persisted row could not be decoded (bad date, timestamp, or integer).
    #[error("malformed row in `{table}`: {reason}")]
    MalformedRow { table: String, reason: String },

    /// A command was invoked with missing or invalid parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PairbotError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }

    /// Wraps any error as a chat platform failure with context.
    pub fn chat<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Chat {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Whether the failure came from external I/O and may succeed on retry.
    ///
    /// Business-logic and data-integrity failures are never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Storage { .. } | Self::Chat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_retryable() {
        assert!(PairbotError::Timeout {
            operation: "get_rows".into(),
            duration: Duration::from_secs(1),
        }
        .is_retryable());
        assert!(PairbotError::storage(std::io::Error::other("disk")).is_retryable());
        assert!(PairbotError::chat("send failed", std::io::Error::other("503")).is_retryable());
    }

    #[test]
    fn logic_failures_are_not_retryable() {
        assert!(!PairbotError::InvalidInput("x".into()).is_retryable());
        assert!(!PairbotError::Config("x".into()).is_retryable());
        assert!(!PairbotError::MalformedRow {
            table: "Posts".into(),
            reason: "x".into(),
        }
        .is_retryable());
    }

    #[test]
    fn timeout_message_names_operation() {
        let err = PairbotError::Timeout {
            operation: "send_message".into(),
            duration: Duration::from_secs(15),
        };
        assert_eq!(err.to_string(), "send_message timed out after 15s");
    }
}

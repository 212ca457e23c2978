// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands and the text users see when they fail.

use pairbot_core::PairbotError;

/// A slash command, already resolved from the platform's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/pair`: run the grouping now.
    Pair,
    /// `/comment [writer] target`: `writer` commented on `target`'s post.
    /// A missing writer means the invoking member.
    Comment {
        writer: Option<String>,
        target: String,
    },
}

impl Command {
    /// Name as registered with the platform.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::Comment { .. } => "comment",
        }
    }
}

/// Reply text for a failed command.
///
/// Validation failures are explained; everything else gets an apology that
/// does not leak internals.
pub fn user_message(err: &PairbotError) -> String {
    match err {
        PairbotError::InvalidInput(msg) => format!("⚠️ {msg}"),
        PairbotError::Timeout { .. } | PairbotError::Chat { .. } | PairbotError::Storage { .. } => {
            "😓 Sorry, an external service did not respond. Please try again in a moment."
                .to_string()
        }
        _ => "😓 Sorry, something went wrong. Please let an admin know.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn invalid_input_is_explained() {
        let msg = user_message(&PairbotError::InvalidInput("pick someone else".into()));
        assert!(msg.contains("pick someone else"));
    }

    #[test]
    fn external_failures_get_generic_apology() {
        let msg = user_message(&PairbotError::Timeout {
            operation: "get_rows".into(),
            duration: Duration::from_secs(15),
        });
        assert!(msg.contains("try again"));
        assert!(!msg.contains("get_rows"));
    }

    #[test]
    fn internal_failures_do_not_leak_details() {
        let msg = user_message(&PairbotError::MalformedRow {
            table: "Comments".into(),
            reason: "bad date".into(),
        });
        assert!(!msg.contains("bad date"));
    }
}

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors raised by the Sheets backend before they are folded into
//! [`PairbotError::Storage`].

use pairbot_core::PairbotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    /// The service account key could not be read or parsed.
    #[error("invalid service account key: {0}")]
    Credentials(String),

    /// RS256 signing of the token assertion failed.
    #[error("failed to sign token assertion")]
    Signing,

    /// Transport-level failure talking to Google.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Google answered with a non-success status.
    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {operation}: {detail}")]
    Decode {
        operation: &'static str,
        detail: String,
    },
}

impl From<SheetsError> for PairbotError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Credentials(msg) => PairbotError::Config(msg),
            other => PairbotError::storage(other),
        }
    }
}

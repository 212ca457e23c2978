// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deadlines and retries for external calls.
//!
//! Every chat-platform and row-store call goes through [`with_timeout`], so a
//! hung API surfaces as [`PairbotError::Timeout`] instead of hanging its
//! handler. Scheduled jobs additionally wrap calls in [`retry`].

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::PairbotError;

/// Timeout and retry settings for external calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Deadline applied to each individual attempt.
    pub timeout: Duration,
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn single_attempt(timeout: Duration) -> Self {
        Self {
            timeout,
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Runs `fut`, failing with [`PairbotError::Timeout`] after `duration`.
pub async fn with_timeout<T, F>(
    operation: &str,
    duration: Duration,
    fut: F,
) -> Result<T, PairbotError>
where
    F: Future<Output = Result<T, PairbotError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(PairbotError::Timeout {
            operation: operation.to_string(),
            duration,
        }),
    }
}

/// Runs `call` under the policy's timeout, retrying retryable failures.
///
/// Non-retryable errors are returned immediately.
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, PairbotError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PairbotError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match with_timeout(operation, policy.timeout, call()).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "external call failed, retrying"
                );
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

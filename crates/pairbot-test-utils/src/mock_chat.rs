// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat platform for deterministic testing.
//!
//! `MockChat` implements `ChatPlatform` with a configurable guild roster and
//! captures every outbound message for assertion in tests. Failures can be
//! injected to exercise retry and error paths.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pairbot_core::{
    AdapterType, ChannelId, ChatPlatform, GuildMember, HealthStatus, PairbotError, PluginAdapter,
};

/// A message captured by [`MockChat::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel: ChannelId,
    pub text: String,
}

/// A human guild member with no roles.
pub fn member(id: &str, name: &str) -> GuildMember {
    GuildMember {
        id: id.to_string(),
        name: name.to_string(),
        is_bot: false,
        roles: Vec::new(),
    }
}

/// A bot account.
pub fn bot(id: &str, name: &str) -> GuildMember {
    GuildMember {
        is_bot: true,
        ..member(id, name)
    }
}

/// A mock chat platform.
///
/// - **members**: returned by `fetch_guild_members()`
/// - **sent**: messages passed to `send_message()`, retrievable via `sent_messages()`
pub struct MockChat {
    members: Mutex<Vec<GuildMember>>,
    sent: Mutex<Vec<SentMessage>>,
    member_failures: AtomicUsize,
    send_failures: AtomicUsize,
    member_calls: AtomicUsize,
}

impl MockChat {
    /// Create a mock with the given roster and no captured messages.
    pub fn new(members: Vec<GuildMember>) -> Self {
        Self {
            members: Mutex::new(members),
            sent: Mutex::new(Vec::new()),
            member_failures: AtomicUsize::new(0),
            send_failures: AtomicUsize::new(0),
            member_calls: AtomicUsize::new(0),
        }
    }

    /// Replace the roster.
    pub async fn set_members(&self, members: Vec<GuildMember>) {
        *self.members.lock().await = members;
    }

    /// Make the next `n` calls to `fetch_guild_members()` fail.
    pub fn fail_next_member_fetches(&self, n: usize) {
        self.member_failures.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` calls to `send_message()` fail.
    pub fn fail_next_sends(&self, n: usize) {
        self.send_failures.store(n, Ordering::SeqCst);
    }

    /// Number of `fetch_guild_members()` calls, failed ones included.
    pub fn member_fetch_count(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }

    /// Get all messages that were sent.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Text of every sent message, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|m| m.text.clone()).collect()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Decrements `counter` if positive; true when a failure should be injected.
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl PluginAdapter for MockChat {
    fn name(&self) -> &str {
        "mock-chat"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, PairbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PairbotError> {
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for MockChat {
    async fn fetch_guild_members(&self) -> Result<Vec<GuildMember>, PairbotError> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.member_failures) {
            return Err(PairbotError::Chat {
                message: "injected member fetch failure".into(),
                source: None,
            });
        }
        Ok(self.members.lock().await.clone())
    }

    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), PairbotError> {
        if take_failure(&self.send_failures) {
            return Err(PairbotError::Chat {
                message: "injected send failure".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage {
            channel,
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_roster() {
        let chat = MockChat::new(vec![member("1", "alice"), bot("2", "helper")]);
        let members = chat.fetch_guild_members().await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[1].is_bot);
        assert_eq!(chat.member_fetch_count(), 1);
    }

    #[tokio::test]
    async fn send_captures_messages() {
        let chat = MockChat::default();
        chat.send_message(ChannelId(7), "hello").await.unwrap();
        assert_eq!(
            chat.sent_messages().await,
            vec![SentMessage {
                channel: ChannelId(7),
                text: "hello".into()
            }]
        );
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let chat = MockChat::default();
        chat.fail_next_sends(1);
        assert!(chat.send_message(ChannelId(1), "a").await.is_err());
        chat.send_message(ChannelId(1), "b").await.unwrap();
        assert_eq!(chat.sent_texts().await, vec!["b".to_string()]);

        chat.fail_next_member_fetches(2);
        assert!(chat.fetch_guild_members().await.is_err());
        assert!(chat.fetch_guild_members().await.is_err());
        assert!(chat.fetch_guild_members().await.is_ok());
        assert_eq!(chat.member_fetch_count(), 3);
    }
}

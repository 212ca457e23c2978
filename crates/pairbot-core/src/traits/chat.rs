// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform trait (Discord).

use async_trait::async_trait;

use crate::error::PairbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelId, GuildMember};

/// Outbound side of the chat platform.
///
/// Inbound events (slash commands, thread creation) are delivered by the
/// platform adapter to the bot service directly; this trait only covers the
/// calls the core logic makes. Delivery is fire-and-forget.
#[async_trait]
pub trait ChatPlatform: PluginAdapter {
    /// Lists every member of the configured guild, bots included.
    async fn fetch_guild_members(&self) -> Result<Vec<GuildMember>, PairbotError>;

    /// Posts a plain-text message to a channel.
    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), PairbotError>;
}

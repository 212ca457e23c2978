// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord adapter for pairbot.
//!
//! [`DiscordChat`] implements [`ChatPlatform`](pairbot_core::ChatPlatform)
//! over the Discord REST API and owns the gateway connection, which it opens
//! in [`DiscordChat::connect`] and closes in `shutdown`. Gateway events are
//! delivered to [`Handler`], which forwards slash commands and forum threads
//! to the [`BotService`](pairbot_service::BotService).

pub mod chat;
pub mod commands;
pub mod handler;

pub use chat::DiscordChat;
pub use handler::Handler;

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for pairbot.
//!
//! Deterministic, in-process stand-ins for the external collaborators so the
//! weekly jobs and command handlers can be exercised without Discord or a
//! spreadsheet.
//!
//! # Components
//!
//! - [`MockChat`] - Chat platform with a fixed roster and captured messages
//! - [`MemoryRowStore`] - Row store backed by in-memory tables

pub mod memory_store;
pub mod mock_chat;

pub use memory_store::MemoryRowStore;
pub use mock_chat::{MockChat, SentMessage, bot, member};

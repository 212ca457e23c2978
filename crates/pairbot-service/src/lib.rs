// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bot service: every trigger pairbot reacts to, independent of the chat
//! platform that delivers it.
//!
//! [`BotService`] owns the chat and row store handles and implements the
//! weekly grouping run, the weekly fine run, `/comment` recording and forum
//! post recording. [`GroupingJob`] and [`FineJob`] adapt the weekly runs to
//! the cron scheduler; [`BotService::handle_command`] turns slash commands
//! into reply text.

pub mod announce;
pub mod command;
pub mod jobs;
pub mod service;
pub mod settings;

pub use command::{Command, user_message};
pub use jobs::{FineJob, GroupingJob};
pub use service::{BotService, CommentOutcome, FineOutcome, GroupingOutcome, decode_week_rows};
pub use settings::ServiceSettings;

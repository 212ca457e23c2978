// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for pairbot.
//!
//! This crate provides the error type, collaborator traits, persisted record
//! types and the KST week arithmetic shared by every other crate in the
//! workspace. Adapters (Discord, SQLite, Google Sheets) implement the traits
//! defined here; the grouping and fine logic consume the records.

pub mod calendar;
pub mod error;
pub mod io;
pub mod records;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use calendar::{kst, week_start};
pub use error::PairbotError;
pub use io::{RetryPolicy, retry, with_timeout};
pub use records::{CommentRecord, FineRecord, PairRecord, PostRecord, Record, Row};
pub use types::{AdapterType, ChannelId, GroupingPolicy, GuildMember, HealthStatus};

pub use traits::{ChatPlatform, PluginAdapter, RowStore};

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence for pairbot.
//!
//! [`SqliteRowStore`] keeps the spreadsheet-like tables in one SQLite file
//! (WAL mode, embedded migrations, single writer via `tokio-rusqlite`).
//! [`DisabledRowStore`] backs the `none` backend, where recording is off.

pub mod adapter;
pub mod database;
pub mod disabled;
pub mod migrations;

pub use adapter::SqliteRowStore;
pub use database::Database;
pub use disabled::DisabledRowStore;

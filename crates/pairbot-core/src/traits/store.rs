// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row store trait for spreadsheet-like persistence backends.

use async_trait::async_trait;

use crate::error::PairbotError;
use crate::records::Row;
use crate::traits::adapter::PluginAdapter;

/// An append-only, schema-loose table store.
///
/// No transactions and no schema enforcement: callers keep column order
/// consistent through the [`Record`](crate::records::Record) codecs.
#[async_trait]
pub trait RowStore: PluginAdapter {
    /// Appends one row to the end of `table`.
    async fn append_row(&self, table: &str, row: Row) -> Result<(), PairbotError>;

    /// Returns every row of `table` in insertion order, header row excluded.
    ///
    /// A table that does not exist yet reads as empty.
    async fn get_rows(&self, table: &str) -> Result<Vec<Row>, PairbotError>;
}

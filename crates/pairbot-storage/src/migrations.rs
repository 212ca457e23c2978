// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary via `embed_migrations!`
//! and applied by [`Database::open`](crate::Database::open).

use pairbot_core::PairbotError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), PairbotError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(PairbotError::storage)?;
    Ok(())
}

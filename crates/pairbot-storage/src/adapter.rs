// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`RowStore`] trait.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use pairbot_core::{AdapterType, HealthStatus, PairbotError, PluginAdapter, Row, RowStore};

use crate::database::{Database, map_tr_err};

/// SQLite-backed row store.
///
/// Every logical table lives in the shared `table_rows` table; cells are
/// stored as a JSON array so rows of any width round-trip unchanged.
pub struct SqliteRowStore {
    path: String,
    db: Database,
}

impl SqliteRowStore {
    /// Opens the store at `path`, creating and migrating the file if needed.
    pub async fn open(path: &str) -> Result<Self, PairbotError> {
        let db = Database::open(path).await?;
        debug!(path, "SQLite row store ready");
        Ok(Self {
            path: path.to_string(),
            db,
        })
    }

    /// Number of rows in `table`.
    pub async fn count_rows(&self, table: &str) -> Result<usize, PairbotError> {
        let table = table.to_string();
        let count = self
            .db
            .connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM table_rows WHERE table_name = ?1",
                    params![table],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(map_tr_err)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl PluginAdapter for SqliteRowStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PairbotError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PairbotError> {
        self.db.checkpoint().await?;
        debug!(path = %self.path, "shutdown: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn append_row(&self, table: &str, row: Row) -> Result<(), PairbotError> {
        let table = table.to_string();
        let cells = serde_json::to_string(&row).map_err(PairbotError::storage)?;
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO table_rows (table_name, cells) VALUES (?1, ?2)",
                    params![table, cells],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn get_rows(&self, table: &str) -> Result<Vec<Row>, PairbotError> {
        let table_name = table.to_string();
        let encoded = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT cells FROM table_rows WHERE table_name = ?1 ORDER BY id ASC",
                )?;
                let cells = stmt
                    .query_map(params![table_name], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(cells)
            })
            .await
            .map_err(map_tr_err)?;

        encoded
            .iter()
            .map(|cells| {
                serde_json::from_str::<Row>(cells).map_err(|e| PairbotError::MalformedRow {
                    table: table.to_string(),
                    reason: format!("stored cells are not a JSON string array: {e}"),
                })
            })
            .collect()
    }
}

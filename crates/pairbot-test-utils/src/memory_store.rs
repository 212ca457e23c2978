// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory row store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pairbot_core::{AdapterType, HealthStatus, PairbotError, PluginAdapter, Row, RowStore};

/// Row store keeping every table in a `HashMap`, with failure injection.
#[derive(Default)]
pub struct MemoryRowStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    read_failures: AtomicUsize,
    append_failures: AtomicUsize,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `table` with `rows` (appended after any existing rows).
    pub async fn seed(&self, table: &str, rows: Vec<Row>) {
        self.tables
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Snapshot of `table`, empty if it was never written.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next `n` reads fail with a storage error.
    pub fn fail_next_reads(&self, n: usize) {
        self.read_failures.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` appends fail with a storage error.
    pub fn fail_next_appends(&self, n: usize) {
        self.append_failures.store(n, Ordering::SeqCst);
    }
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn injected(op: &str) -> PairbotError {
    PairbotError::storage(std::io::Error::other(format!("injected {op} failure")))
}

#[async_trait]
impl PluginAdapter for MemoryRowStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PairbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PairbotError> {
        Ok(())
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn append_row(&self, table: &str, row: Row) -> Result<(), PairbotError> {
        if take_failure(&self.append_failures) {
            return Err(injected("append"));
        }
        self.tables
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn get_rows(&self, table: &str) -> Result<Vec<Row>, PairbotError> {
        if take_failure(&self.read_failures) {
            return Err(injected("read"));
        }
        Ok(self.rows(table).await)
    }
}

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row store used when recording is switched off.

use async_trait::async_trait;
use tracing::debug;

use pairbot_core::{AdapterType, HealthStatus, PairbotError, PluginAdapter, Row, RowStore};

/// Drops every append and reads every table as empty.
#[derive(Debug, Default)]
pub struct DisabledRowStore;

#[async_trait]
impl PluginAdapter for DisabledRowStore {
    fn name(&self) -> &str {
        "none"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PairbotError> {
        Ok(HealthStatus::Degraded("recording disabled".into()))
    }

    async fn shutdown(&self) -> Result<(), PairbotError> {
        Ok(())
    }
}

#[async_trait]
impl RowStore for DisabledRowStore {
    async fn append_row(&self, table: &str, row: Row) -> Result<(), PairbotError> {
        debug!(table, cells = row.len(), "recording disabled, dropping row");
        Ok(())
    }

    async fn get_rows(&self, _table: &str) -> Result<Vec<Row>, PairbotError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_vanish() {
        let store = DisabledRowStore;
        store.append_row("Pairs", vec!["a".into()]).await.unwrap();
        assert!(store.get_rows("Pairs").await.unwrap().is_empty());
    }
}

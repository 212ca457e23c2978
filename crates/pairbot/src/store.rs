// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row store selection from `[storage].backend`.

use std::sync::Arc;

use pairbot_config::PairbotConfig;
use pairbot_config::model::StorageBackend;
use pairbot_core::{PairbotError, PluginAdapter, RowStore};
use tracing::info;

/// Opens the configured row store backend.
pub async fn open_row_store(config: &PairbotConfig) -> Result<Arc<dyn RowStore>, PairbotError> {
    let store: Arc<dyn RowStore> = match config.storage.backend {
        StorageBackend::Sqlite => Arc::new(
            pairbot_storage::SqliteRowStore::open(&config.storage.database_path).await?,
        ),
        #[cfg(feature = "sheets")]
        StorageBackend::Sheets => {
            Arc::new(pairbot_sheets::SheetsRowStore::connect(&config.sheets).await?)
        }
        StorageBackend::None => Arc::new(pairbot_storage::DisabledRowStore),
        #[allow(unreachable_patterns)]
        other => {
            return Err(PairbotError::Config(format!(
                "storage backend {other:?} is not compiled into this binary"
            )));
        }
    };
    info!(backend = store.name(), "row store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlite_backend_opens_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PairbotConfig::default();
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.database_path = dir.path().join("rows.db").display().to_string();

        let store = open_row_store(&config).await.unwrap();
        assert_eq!(store.name(), "sqlite");
        store.append_row("Pairs", vec!["2026-10-19".into(), "1".into(), "7".into()]).await.unwrap();
        assert_eq!(store.get_rows("Pairs").await.unwrap().len(), 1);
        assert!(dir.path().join("rows.db").exists());
    }

    #[tokio::test]
    async fn none_backend_drops_rows() {
        let mut config = PairbotConfig::default();
        config.storage.backend = StorageBackend::None;
        let store = open_row_store(&config).await.unwrap();
        store.append_row("Pairs", vec!["x".into()]).await.unwrap();
        assert!(store.get_rows("Pairs").await.unwrap().is_empty());
    }

    #[cfg(feature = "sheets")]
    #[tokio::test]
    async fn sheets_backend_requires_credentials() {
        let mut config = PairbotConfig::default();
        config.storage.backend = StorageBackend::Sheets;
        config.sheets.spreadsheet_id = Some("sheet".into());
        assert!(matches!(
            open_row_store(&config).await,
            Err(PairbotError::Config(_))
        ));
    }
}

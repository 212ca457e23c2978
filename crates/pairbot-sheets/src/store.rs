// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Sheets implementation of the [`RowStore`] trait.
//!
//! Each logical table is one sheet (tab) of the configured spreadsheet. The
//! first row of every sheet is a header and is never returned by reads.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use pairbot_config::model::SheetsConfig;
use pairbot_core::{AdapterType, HealthStatus, PairbotError, PluginAdapter, Row, RowStore};

use crate::auth::{ServiceAccountTokens, TokenSource};
use crate::credentials::ServiceAccountKey;
use crate::error::SheetsError;

/// Backstop for a single HTTP exchange; callers apply their own deadline.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Cells are stored verbatim. Discord ids exceed f64 precision, so letting
/// Sheets parse them as numbers would corrupt them.
pub const VALUE_INPUT_OPTION: &str = "RAW";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Spreadsheet-backed row store.
pub struct SheetsRowStore {
    client: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    tokens: Arc<dyn TokenSource>,
}

impl SheetsRowStore {
    /// Builds a store from configuration, loading the service account key.
    ///
    /// The inline JSON key wins over the key file when both are set.
    pub async fn connect(config: &SheetsConfig) -> Result<Self, PairbotError> {
        let spreadsheet_id = config
            .spreadsheet_id
            .clone()
            .ok_or_else(|| PairbotError::Config("sheets.spreadsheet_id is required".into()))?;

        let key = match (&config.service_account_json, &config.service_account_path) {
            (Some(json), _) => ServiceAccountKey::from_json(json)?,
            (None, Some(path)) => ServiceAccountKey::from_file(Path::new(path)).await?,
            (None, None) => {
                return Err(PairbotError::Config(
                    "sheets backend needs service_account_json or service_account_path".into(),
                ));
            }
        };

        let client = build_client()?;
        let tokens = ServiceAccountTokens::new(client.clone(), &key)?;
        debug!(client_email = %key.client_email, %spreadsheet_id, "Sheets row store ready");
        Ok(Self::with_token_source(
            client,
            &config.api_base,
            spreadsheet_id,
            Arc::new(tokens),
        ))
    }

    /// Builds a store around an existing client and token source.
    pub fn with_token_source(
        client: reqwest::Client,
        api_base: &str,
        spreadsheet_id: String,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            spreadsheet_id,
            tokens,
        }
    }

    /// `{base}/spreadsheets/{id}` followed by `extra` path segments.
    fn url(&self, extra: &[&str]) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| SheetsError::Decode {
            operation: "api_base",
            detail: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::Decode {
                operation: "api_base",
                detail: "URL cannot have path segments".into(),
            })?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .extend(extra);
        Ok(url)
    }

    async fn append(&self, table: &str, row: Row) -> Result<(), SheetsError> {
        let range = format!("{}:append", sheet_range(table));
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", VALUE_INPUT_OPTION)
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.tokens.access_token().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Status {
                operation: "values.append",
                status: status.as_u16(),
                body,
            });
        }
        debug!(table, "appended row to sheet");
        Ok(())
    }

    async fn read(&self, table: &str) -> Result<Vec<Row>, SheetsError> {
        let url = self.url(&["values", &sheet_range(table)])?;
        let token = self.tokens.access_token().await?;
        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 400 && body.contains("Unable to parse range") {
                debug!(table, "sheet does not exist, reading as empty");
                return Ok(Vec::new());
            }
            return Err(SheetsError::Status {
                operation: "values.get",
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let range: ValueRange = serde_json::from_str(&body).map_err(|e| SheetsError::Decode {
            operation: "values.get",
            detail: e.to_string(),
        })?;

        Ok(range
            .values
            .into_iter()
            .skip(1)
            .map(|cells| cells.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn build_client() -> Result<reqwest::Client, PairbotError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(PairbotError::storage)
}

/// A1 range covering a whole sheet; names are quoted so spaces survive.
fn sheet_range(table: &str) -> String {
    format!("'{}'", table.replace('\'', "''"))
}

/// Formatted cells come back as strings; anything else is stringified.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl PluginAdapter for SheetsRowStore {
    fn name(&self) -> &str {
        "sheets"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PairbotError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut().append_pair("fields", "spreadsheetId");
        let token = match self.tokens.access_token().await {
            Ok(token) => token,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        let status = match self.client.get(url).bearer_auth(token).send().await {
            Ok(response) => response.status(),
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        if status.is_success() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!("spreadsheet returned {status}")))
        }
    }

    async fn shutdown(&self) -> Result<(), PairbotError> {
        Ok(())
    }
}

#[async_trait]
impl RowStore for SheetsRowStore {
    async fn append_row(&self, table: &str, row: Row) -> Result<(), PairbotError> {
        Ok(self.append(table, row).await?)
    }

    async fn get_rows(&self, table: &str) -> Result<Vec<Row>, PairbotError> {
        Ok(self.read(table).await?)
    }
}

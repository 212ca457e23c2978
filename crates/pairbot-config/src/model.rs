// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for pairbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use pairbot_core::{GroupingPolicy, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Top-level pairbot configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PairbotConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Discord connection and channels.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Weekly group assignment.
    #[serde(default)]
    pub grouping: GroupingConfig,

    /// Weekly fine evaluation.
    #[serde(default)]
    pub fines: FinesConfig,

    /// Row store backend selection.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Google Sheets backend settings.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Table (sheet) names for each record type.
    #[serde(default)]
    pub tables: TablesConfig,

    /// Timeouts and retries for external calls.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "pairbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discord connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    /// Bot token. `None` means the bot cannot connect (checked by `serve`).
    #[serde(default)]
    pub token: Option<String>,

    /// The guild whose members are grouped and fined.
    #[serde(default)]
    pub guild_id: Option<u64>,

    /// Channel where group assignments are announced.
    #[serde(default)]
    pub announce_channel_id: Option<u64>,

    /// Forum channel whose new threads count as weekly posts.
    #[serde(default)]
    pub forum_channel_id: Option<u64>,

    /// Register the slash commands on the guild at startup.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            guild_id: None,
            announce_channel_id: None,
            forum_channel_id: None,
            register_commands: true,
        }
    }
}

/// Weekly grouping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupingConfig {
    /// Run the scheduled grouping job.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cron expression evaluated in KST.
    #[serde(default = "default_grouping_schedule")]
    pub schedule: String,

    /// `groups` (2 or 3) or `pairs` (strict pairs).
    #[serde(default)]
    pub policy: GroupingPolicy,

    /// Only members holding this role are grouped. `None` groups everyone.
    #[serde(default)]
    pub required_role_id: Option<u64>,

    /// Append Pair Records to the row store.
    #[serde(default = "default_true")]
    pub record_pairs: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_grouping_schedule(),
            policy: GroupingPolicy::default(),
            required_role_id: None,
            record_pairs: true,
        }
    }
}

fn default_grouping_schedule() -> String {
    // Mondays 10:00 KST.
    "0 10 * * 1".to_string()
}

/// Weekly fine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FinesConfig {
    /// Run the scheduled fine job.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cron expression evaluated in KST. The job evaluates the previous week.
    #[serde(default = "default_fines_schedule")]
    pub schedule: String,

    /// Channel for the fine summary. Falls back to `discord.announce_channel_id`.
    #[serde(default)]
    pub announce_channel_id: Option<u64>,

    /// Append Fine Records to the row store.
    #[serde(default = "default_true")]
    pub record_fines: bool,
}

impl Default for FinesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_fines_schedule(),
            announce_channel_id: None,
            record_fines: true,
        }
    }
}

fn default_fines_schedule() -> String {
    "0 9 * * 1".to_string()
}

/// Which row store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local SQLite file.
    #[default]
    Sqlite,
    /// Google Sheets spreadsheet.
    Sheets,
    /// No persistence: appends are dropped, reads are empty.
    None,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pairbot").join("pairbot.db"))
        .unwrap_or_else(|| "pairbot.db".into())
        .display()
        .to_string()
}

/// Google Sheets backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Target spreadsheet id (from its URL).
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Path to a service account JSON key file.
    #[serde(default)]
    pub service_account_path: Option<String>,

    /// Inline service account JSON key. Takes precedence over the path.
    #[serde(default)]
    pub service_account_json: Option<String>,

    /// Sheets REST API base URL.
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            service_account_path: None,
            service_account_json: None,
            api_base: default_sheets_api_base(),
        }
    }
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

/// Table names for each record type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TablesConfig {
    #[serde(default = "default_pairs_table")]
    pub pairs: String,
    #[serde(default = "default_comments_table")]
    pub comments: String,
    #[serde(default = "default_posts_table")]
    pub posts: String,
    #[serde(default = "default_fines_table")]
    pub fines: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            pairs: default_pairs_table(),
            comments: default_comments_table(),
            posts: default_posts_table(),
            fines: default_fines_table(),
        }
    }
}

impl TablesConfig {
    /// All configured names with their keys, for validation.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("pairs", &self.pairs),
            ("comments", &self.comments),
            ("posts", &self.posts),
            ("fines", &self.fines),
        ]
    }
}

fn default_pairs_table() -> String {
    "Pairs".to_string()
}

fn default_comments_table() -> String {
    "Comments".to_string()
}

fn default_posts_table() -> String {
    "Posts".to_string()
}

fn default_fines_table() -> String {
    "Fines".to_string()
}

/// Timeouts and retries for external calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Deadline for each chat or row store call.
    #[serde(default = "default_external_timeout_secs")]
    pub external_timeout_secs: u64,

    /// Attempts for scheduled jobs' external calls, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            external_timeout_secs: default_external_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl RuntimeConfig {
    /// Policy for scheduled jobs.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(self.external_timeout_secs),
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    /// Policy for interactive commands: same deadline, no retries.
    pub fn interactive_policy(&self) -> RetryPolicy {
        RetryPolicy::single_attempt(Duration::from_secs(self.external_timeout_secs))
    }
}

fn default_external_timeout_secs() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

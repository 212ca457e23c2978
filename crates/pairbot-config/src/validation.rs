// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as parseable cron schedules, non-zero Discord ids, and backend-specific
//! required settings.

use std::collections::HashSet;
use std::str::FromStr;

use croner::Cron;

use crate::diagnostic::ConfigError;
use crate::model::{PairbotConfig, StorageBackend};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PairbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_schedule(&mut errors, "grouping.schedule", &config.grouping.schedule);
    check_schedule(&mut errors, "fines.schedule", &config.fines.schedule);

    let ids = [
        ("discord.guild_id", config.discord.guild_id),
        ("discord.announce_channel_id", config.discord.announce_channel_id),
        ("discord.forum_channel_id", config.discord.forum_channel_id),
        ("grouping.required_role_id", config.grouping.required_role_id),
        ("fines.announce_channel_id", config.fines.announce_channel_id),
    ];
    for (key, id) in ids {
        if id == Some(0) {
            errors.push(validation(format!("{key} must be a non-zero Discord id")));
        }
    }

    if let Some(token) = &config.discord.token
        && token.trim().is_empty()
    {
        errors.push(validation("discord.token must not be empty when set"));
    }

    if config.fines.enabled && config.discord.forum_channel_id.is_none() {
        errors.push(validation(
            "discord.forum_channel_id is required when fines.enabled = true; without it no posts are recorded and every member is fined for a missing post",
        ));
    }

    match config.storage.backend {
        StorageBackend::Sqlite => {
            if config.storage.database_path.trim().is_empty() {
                errors.push(validation("storage.database_path must not be empty"));
            }
        }
        StorageBackend::Sheets => {
            if config
                .sheets
                .spreadsheet_id
                .as_deref()
                .is_none_or(|id| id.trim().is_empty())
            {
                errors.push(validation(
                    "sheets.spreadsheet_id is required when storage.backend = \"sheets\"",
                ));
            }
            if config.sheets.service_account_json.is_none()
                && config.sheets.service_account_path.is_none()
            {
                errors.push(validation(
                    "sheets.service_account_json or sheets.service_account_path is required when storage.backend = \"sheets\"",
                ));
            }
            if !config.sheets.api_base.starts_with("http") {
                errors.push(validation(format!(
                    "sheets.api_base `{}` must be an http(s) URL",
                    config.sheets.api_base
                )));
            }
        }
        StorageBackend::None => {}
    }

    let mut seen_tables = HashSet::new();
    for (key, name) in config.tables.entries() {
        if name.trim().is_empty() {
            errors.push(validation(format!("tables.{key} must not be empty")));
        } else if !seen_tables.insert(name) {
            errors.push(validation(format!(
                "tables.{key} reuses table name `{name}`; every record type needs its own table"
            )));
        }
    }

    if config.runtime.external_timeout_secs == 0 {
        errors.push(validation("runtime.external_timeout_secs must be at least 1"));
    }
    if config.runtime.max_attempts == 0 {
        errors.push(validation("runtime.max_attempts must be at least 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_schedule(errors: &mut Vec<ConfigError>, key: &str, expression: &str) {
    if let Err(e) = Cron::from_str(expression) {
        errors.push(validation(format!(
            "{key} `{expression}` is not a valid cron expression: {e}"
        )));
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PairbotConfig {
        let mut config = PairbotConfig::default();
        config.discord.forum_channel_id = Some(1_100_000_000_000_000_003);
        config
    }

    fn messages(config: &PairbotConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn config_with_forum_channel_validates() {
        assert!(validate_config(&base()).is_ok());
    }

    #[test]
    fn fines_without_forum_channel_fail_validation() {
        let errors = messages(&PairbotConfig::default());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("discord.forum_channel_id"));
        assert!(errors[0].contains("fines.enabled"));
    }

    #[test]
    fn disabled_fines_do_not_need_a_forum_channel() {
        let mut config = PairbotConfig::default();
        config.fines.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_schedule_fails_validation() {
        let mut config = base();
        config.grouping.schedule = "every monday".to_string();
        let errors = messages(&config);
        assert!(errors.iter().any(|m| m.contains("grouping.schedule")));
    }

    #[test]
    fn zero_ids_fail_validation() {
        let mut config = base();
        config.discord.guild_id = Some(0);
        config.grouping.required_role_id = Some(0);
        let errors = messages(&config);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn sheets_backend_requires_spreadsheet_and_credentials() {
        let mut config = base();
        config.storage.backend = StorageBackend::Sheets;
        let errors = messages(&config);
        assert!(errors.iter().any(|m| m.contains("sheets.spreadsheet_id")));
        assert!(errors.iter().any(|m| m.contains("service_account")));
    }

    #[test]
    fn complete_sheets_config_passes() {
        let mut config = base();
        config.storage.backend = StorageBackend::Sheets;
        config.sheets.spreadsheet_id = Some("abc123".into());
        config.sheets.service_account_path = Some("/etc/pairbot/sa.json".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_table_names_fail_validation() {
        let mut config = base();
        config.tables.fines = "Posts".to_string();
        let errors = messages(&config);
        assert!(errors.iter().any(|m| m.contains("tables.fines")));
    }

    #[test]
    fn none_backend_ignores_database_path() {
        let mut config = base();
        config.storage.backend = StorageBackend::None;
        config.storage.database_path = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_attempts_and_timeout_fail_validation() {
        let mut config = base();
        config.runtime.max_attempts = 0;
        config.runtime.external_timeout_secs = 0;
        assert_eq!(messages(&config).len(), 2);
    }
}

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the pairbot configuration system.

use pairbot_config::diagnostic::ConfigError;
use pairbot_config::model::StorageBackend;
use pairbot_config::{load_and_validate_str, load_config_from_str};
use pairbot_core::GroupingPolicy;

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn full_config_deserializes() {
    let toml = r#"
[bot]
name = "study-bot"
log_level = "debug"

[discord]
token = "abc.def.ghi"
guild_id = 1100000000000000001
announce_channel_id = 1100000000000000002
forum_channel_id = 1100000000000000003
register_commands = false

[grouping]
enabled = true
schedule = "30 9 * * 1"
policy = "pairs"
required_role_id = 1100000000000000004
record_pairs = false

[fines]
schedule = "0 8 * * 1"
announce_channel_id = 1100000000000000005

[storage]
backend = "sheets"

[sheets]
spreadsheet_id = "sheet-123"
service_account_path = "/etc/pairbot/sa.json"

[tables]
pairs = "페어"

[runtime]
external_timeout_secs = 30
max_attempts = 2
retry_backoff_ms = 100
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should load");
    assert_eq!(config.bot.name, "study-bot");
    assert_eq!(config.discord.guild_id, Some(1_100_000_000_000_000_001));
    assert!(!config.discord.register_commands);
    assert_eq!(config.grouping.policy, GroupingPolicy::Pairs);
    assert_eq!(config.grouping.required_role_id, Some(1_100_000_000_000_000_004));
    assert!(!config.grouping.record_pairs);
    assert_eq!(config.fines.schedule, "0 8 * * 1");
    assert!(config.fines.record_fines);
    assert_eq!(config.storage.backend, StorageBackend::Sheets);
    assert_eq!(config.sheets.spreadsheet_id.as_deref(), Some("sheet-123"));
    assert_eq!(config.tables.pairs, "페어");
    assert_eq!(config.tables.comments, "Comments");
    assert_eq!(config.runtime.retry_policy().max_attempts, 2);
    assert_eq!(config.runtime.interactive_policy().max_attempts, 1);
}

/// Empty input yields the documented defaults.
#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").expect("defaults should deserialize");
    assert_eq!(config.bot.name, "pairbot");
    assert_eq!(config.grouping.schedule, "0 10 * * 1");
    assert_eq!(config.grouping.policy, GroupingPolicy::Groups);
    assert_eq!(config.fines.schedule, "0 9 * * 1");
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert!(config.discord.token.is_none());
}

/// Fines stay enabled by default, so a forum channel must be configured.
#[test]
fn default_fines_require_a_forum_channel() {
    let errors = load_and_validate_str("").expect_err("fines need a forum channel");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("discord.forum_channel_id"));

    let config = load_and_validate_str(
        r#"
[discord]
forum_channel_id = 1100000000000000003
"#,
    )
    .expect("forum channel satisfies fines");
    assert!(config.fines.enabled);

    let config = load_and_validate_str(
        r#"
[fines]
enabled = false
"#,
    )
    .expect("disabled fines need no forum channel");
    assert!(!config.fines.enabled);
}

/// Unknown keys are rejected with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[discord]
gild_id = 1
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "gild_id");
            assert_eq!(suggestion.as_deref(), Some("guild_id"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown policy names fail deserialization.
#[test]
fn unknown_policy_is_rejected() {
    let toml = r#"
[grouping]
policy = "triples"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Wrong value types are reported.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[runtime]
max_attempts = "three"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string");
    assert!(!errors.is_empty());
}

/// Semantic errors come back together.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[discord]
forum_channel_id = 1100000000000000003

[grouping]
schedule = "not a cron"

[fines]
schedule = "also not"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

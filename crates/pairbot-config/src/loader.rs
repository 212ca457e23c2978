// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pairbot.toml` > `~/.config/pairbot/pairbot.toml` >
//! `/etc/pairbot/pairbot.toml` with environment variable overrides via `PAIRBOT_`.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::CONFIG_FILE_NAME;
use crate::model::PairbotConfig;

/// Top-level sections an env var may address, matched as `PAIRBOT_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "bot", "discord", "grouping", "fines", "storage", "sheets", "tables", "runtime",
];

/// Config files in merge order, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/pairbot").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("pairbot").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

/// Build the layered Figment (exposed for diagnostic use).
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pairbot/pairbot.toml`
/// 3. `~/.config/pairbot/pairbot.toml`
/// 4. `./pairbot.toml`
/// 5. `PAIRBOT_*` environment variables
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(PairbotConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<PairbotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PairbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PairbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PairbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PairbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `PAIRBOT_DISCORD_GUILD_ID` to `discord.guild_id`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// key names that themselves contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("PAIRBOT_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}

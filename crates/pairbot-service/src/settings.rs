// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime settings the service reads from configuration.

use pairbot_config::PairbotConfig;
use pairbot_config::model::TablesConfig;
use pairbot_core::{ChannelId, GroupingPolicy, RetryPolicy};

/// Flattened view of the configuration sections the service needs.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub announce_channel: Option<ChannelId>,
    /// Fine summaries go here; defaults to `announce_channel`.
    pub fines_channel: Option<ChannelId>,
    pub forum_channel: Option<u64>,
    pub policy: GroupingPolicy,
    pub required_role: Option<u64>,
    pub record_pairs: bool,
    pub record_fines: bool,
    pub tables: TablesConfig,
    /// Used by scheduled jobs and gateway events.
    pub scheduled: RetryPolicy,
    /// Used by slash commands.
    pub interactive: RetryPolicy,
}

impl ServiceSettings {
    pub fn from_config(config: &PairbotConfig) -> Self {
        let announce_channel = config.discord.announce_channel_id.map(ChannelId);
        Self {
            announce_channel,
            fines_channel: config
                .fines
                .announce_channel_id
                .map(ChannelId)
                .or(announce_channel),
            forum_channel: config.discord.forum_channel_id,
            policy: config.grouping.policy,
            required_role: config.grouping.required_role_id,
            record_pairs: config.grouping.record_pairs,
            record_fines: config.fines.record_fines,
            tables: config.tables.clone(),
            scheduled: config.runtime.retry_policy(),
            interactive: config.runtime.interactive_policy(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&PairbotConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fines_channel_falls_back_to_announce_channel() {
        let mut config = PairbotConfig::default();
        config.discord.announce_channel_id = Some(10);
        assert_eq!(
            ServiceSettings::from_config(&config).fines_channel,
            Some(ChannelId(10))
        );

        config.fines.announce_channel_id = Some(20);
        assert_eq!(
            ServiceSettings::from_config(&config).fines_channel,
            Some(ChannelId(20))
        );
    }

    #[test]
    fn interactive_policy_never_retries() {
        let settings = ServiceSettings::default();
        assert_eq!(settings.interactive.max_attempts, 1);
        assert_eq!(settings.scheduled.max_attempts, 3);
        assert_eq!(settings.interactive.timeout, settings.scheduled.timeout);
    }
}

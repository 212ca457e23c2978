// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord implementation of [`ChatPlatform`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    ChannelId as DiscordChannelId, Client, GatewayIntents, GuildId, Http, Member, ShardManager,
    UserId,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use pairbot_config::model::DiscordConfig;
use pairbot_core::{
    AdapterType, ChannelId, ChatPlatform, GuildMember, HealthStatus, PairbotError, PluginAdapter,
};

use crate::handler::Handler;

/// Page size for the guild member list endpoint.
const MEMBER_PAGE: u64 = 1000;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// An owned Discord connection: REST client plus, once connected, the gateway.
pub struct DiscordChat {
    token: String,
    guild_id: GuildId,
    http: Arc<Http>,
    shard_manager: Mutex<Option<Arc<ShardManager>>>,
    gateway_task: Mutex<Option<JoinHandle<()>>>,
}

impl DiscordChat {
    /// Creates the adapter. Requires `discord.token` and `discord.guild_id`.
    pub fn new(config: &DiscordConfig) -> Result<Self, PairbotError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PairbotError::Config("discord.token is required".into()))?;
        let guild_id = config
            .guild_id
            .filter(|id| *id != 0)
            .map(GuildId::new)
            .ok_or_else(|| PairbotError::Config("discord.guild_id is required".into()))?;

        Ok(Self {
            http: Arc::new(Http::new(&token)),
            token,
            guild_id,
            shard_manager: Mutex::new(None),
            gateway_task: Mutex::new(None),
        })
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Opens the gateway connection and starts delivering events to `handler`.
    ///
    /// Calling it again while connected is a no-op.
    pub async fn connect(&self, handler: Handler) -> Result<(), PairbotError> {
        let mut task = self.gateway_task.lock().await;
        if task.is_some() {
            return Ok(());
        }

        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;
        let mut client = Client::builder(&self.token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| PairbotError::chat("failed to build Discord client", e))?;

        *self.shard_manager.lock().await = Some(client.shard_manager.clone());
        info!(guild_id = %self.guild_id, "connecting to Discord gateway");
        *task = Some(tokio::spawn(async move {
            if let Err(e) = client.start().await {
                error!(error = %e, "Discord gateway stopped");
            }
        }));
        Ok(())
    }
}

fn to_guild_member(member: &Member) -> GuildMember {
    GuildMember {
        id: member.user.id.to_string(),
        name: member.display_name().to_string(),
        is_bot: member.user.bot,
        roles: member.roles.iter().map(|r| r.get()).collect(),
    }
}

#[async_trait]
impl PluginAdapter for DiscordChat {
    fn name(&self) -> &str {
        "discord"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, PairbotError> {
        let connected = self.gateway_task.lock().await.is_some();
        match self.http.get_current_user().await {
            Ok(_) if connected => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Degraded("gateway not connected".into())),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("Discord unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), PairbotError> {
        if let Some(manager) = self.shard_manager.lock().await.take() {
            debug!("closing Discord shards");
            manager.shutdown_all().await;
        }
        if let Some(task) = self.gateway_task.lock().await.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err() {
                warn!("Discord gateway task did not stop in time");
            }
        }
        info!("Discord connection closed");
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for DiscordChat {
    async fn fetch_guild_members(&self) -> Result<Vec<GuildMember>, PairbotError> {
        let mut members = Vec::new();
        let mut after: Option<UserId> = None;
        loop {
            let page = self
                .guild_id
                .members(&self.http, Some(MEMBER_PAGE), after)
                .await
                .map_err(|e| PairbotError::chat("failed to list guild members", e))?;
            let full_page = page.len() as u64 == MEMBER_PAGE;
            after = page.last().map(|m| m.user.id);
            members.extend(page.iter().map(to_guild_member));
            if !full_page {
                break;
            }
        }
        debug!(guild_id = %self.guild_id, count = members.len(), "fetched guild members");
        Ok(members)
    }

    async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), PairbotError> {
        DiscordChannelId::new(channel.0)
            .say(&self.http, text)
            .await
            .map_err(|e| PairbotError::chat(format!("failed to send to channel {channel}"), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, guild: Option<u64>) -> DiscordConfig {
        DiscordConfig {
            token: token.map(str::to_string),
            guild_id: guild,
            ..DiscordConfig::default()
        }
    }

    #[test]
    fn token_is_required() {
        assert!(matches!(
            DiscordChat::new(&config(None, Some(1))),
            Err(PairbotError::Config(_))
        ));
        assert!(matches!(
            DiscordChat::new(&config(Some("  "), Some(1))),
            Err(PairbotError::Config(_))
        ));
    }

    #[test]
    fn guild_id_is_required_and_non_zero() {
        assert!(DiscordChat::new(&config(Some("t"), None)).is_err());
        assert!(DiscordChat::new(&config(Some("t"), Some(0))).is_err());
        let chat = DiscordChat::new(&config(Some("t"), Some(42))).unwrap();
        assert_eq!(chat.guild_id().get(), 42);
    }

    #[tokio::test]
    async fn shutdown_before_connect_is_a_no_op() {
        let chat = DiscordChat::new(&config(Some("t"), Some(42))).unwrap();
        chat.shutdown().await.unwrap();
    }
}

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handler.
//!
//! Slash commands are acknowledged immediately (deferred) and completed with
//! a single follow-up edit carrying the service's reply. New forum threads
//! are handed to the service as weekly posts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serenity::all::{
    CommandInteraction, Context, EditInteractionResponse, EventHandler, GuildChannel, GuildId,
    Interaction, Ready,
};
use tracing::{debug, error, info, warn};

use pairbot_core::calendar::now_kst;
use pairbot_core::kst;
use pairbot_service::{BotService, user_message};

use crate::commands;

/// Forwards Discord events to the [`BotService`].
pub struct Handler {
    service: Arc<BotService>,
    guild_id: GuildId,
    register_commands: bool,
}

impl Handler {
    pub fn new(service: Arc<BotService>, guild_id: GuildId, register_commands: bool) -> Self {
        Self {
            service,
            guild_id,
            register_commands,
        }
    }

    async fn run_command(&self, ctx: &Context, command: &CommandInteraction) {
        if command.guild_id != Some(self.guild_id) {
            debug!(command = %command.data.name, "ignoring command from another guild");
            return;
        }

        if let Err(e) = command.defer(&ctx.http).await {
            warn!(command = %command.data.name, error = %e, "failed to acknowledge command");
            return;
        }

        let invoker = command.user.id.to_string();
        let options = commands::user_options(&command.data.options());
        let reply = match commands::parse(&command.data.name, &options) {
            Ok(parsed) => {
                info!(command = %command.data.name, invoker, "running command");
                self.service.handle_command(&invoker, parsed, now_kst()).await
            }
            Err(e) => user_message(&e),
        };

        if let Err(e) = command
            .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
            .await
        {
            error!(command = %command.data.name, error = %e, "failed to send command reply");
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guild_id = %self.guild_id, "Discord gateway ready");
        if !self.register_commands {
            return;
        }
        match self
            .guild_id
            .set_commands(&ctx.http, commands::definitions())
            .await
        {
            Ok(registered) => info!(count = registered.len(), "registered slash commands"),
            Err(e) => error!(error = %e, "failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.run_command(&ctx, &command).await;
        }
    }

    async fn thread_create(&self, _ctx: Context, thread: GuildChannel) {
        let Some(owner) = thread.owner_id else {
            return;
        };
        let Some(created_at) = DateTime::from_timestamp(thread.id.created_at().unix_timestamp(), 0)
        else {
            warn!(thread_id = %thread.id, "thread has an out-of-range creation time");
            return;
        };
        let parent = thread.parent_id.map(|id| id.get());

        if let Err(e) = self
            .service
            .record_post(&owner.to_string(), parent, created_at.with_timezone(&kst()))
            .await
        {
            error!(thread_id = %thread.id, owner = %owner, error = %e, "failed to record post");
        }
    }
}

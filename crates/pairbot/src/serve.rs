// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pairbot serve` command implementation.
//!
//! Opens the row store, connects to Discord, schedules the weekly grouping
//! and fine jobs, then waits for SIGINT/SIGTERM and shuts everything down in
//! reverse order.

use std::sync::Arc;

use pairbot_config::PairbotConfig;
use pairbot_core::{PairbotError, PluginAdapter, kst};
use pairbot_cron::Scheduler;
use pairbot_discord::{DiscordChat, Handler};
use pairbot_service::{BotService, FineJob, GroupingJob, ServiceSettings};
use tracing::{error, info};

use crate::shutdown;
use crate::store::open_row_store;

/// Runs the `pairbot serve` command until a shutdown signal arrives.
pub async fn run_serve(config: PairbotConfig) -> Result<(), PairbotError> {
    init_tracing(&config.bot.log_level);
    info!(name = %config.bot.name, "starting pairbot serve");

    let store = open_row_store(&config).await?;
    let chat = Arc::new(DiscordChat::new(&config.discord)?);
    let service = Arc::new(BotService::new(
        chat.clone(),
        store.clone(),
        ServiceSettings::from_config(&config),
    ));

    let scheduler = build_scheduler(&config, &service)?;
    for (job, next) in scheduler.upcoming(&chrono::Utc::now().with_timezone(&kst())) {
        if let Some(next) = next {
            info!(job, next = %next, "next scheduled run");
        }
    }

    chat.connect(Handler::new(
        service.clone(),
        chat.guild_id(),
        config.discord.register_commands,
    ))
    .await?;

    let cancel = shutdown::install_signal_handler();
    let jobs = scheduler.run(cancel.clone());
    info!("pairbot is running");
    log_memory("started");

    cancel.cancelled().await;
    info!("shutting down");

    jobs.join().await;
    if let Err(e) = chat.shutdown().await {
        error!(error = %e, "Discord shutdown failed");
    }
    if let Err(e) = store.shutdown().await {
        error!(error = %e, "row store shutdown failed");
    }
    log_memory("stopped");
    info!("pairbot stopped");
    Ok(())
}

/// Registers the enabled weekly jobs.
fn build_scheduler(
    config: &PairbotConfig,
    service: &Arc<BotService>,
) -> Result<Scheduler, PairbotError> {
    let mut scheduler = Scheduler::new();
    if config.grouping.enabled {
        scheduler.add(
            &config.grouping.schedule,
            Arc::new(GroupingJob::new(service.clone())),
        )?;
    } else {
        info!("grouping job disabled");
    }
    if config.fines.enabled {
        scheduler.add(&config.fines.schedule, Arc::new(FineJob::new(service.clone())))?;
    } else {
        info!("fine job disabled");
    }
    Ok(scheduler)
}

/// Logs jemalloc heap statistics at a lifecycle point.
#[cfg(not(target_env = "msvc"))]
fn log_memory(stage: &str) {
    // Stats are cached until the epoch advances.
    let _ = tikv_jemalloc_ctl::epoch::advance();
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    info!(
        stage,
        allocated_kb = allocated / 1024,
        resident_kb = resident / 1024,
        "memory usage"
    );
}

#[cfg(target_env = "msvc")]
fn log_memory(_stage: &str) {}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pairbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairbot_config::model::StorageBackend;

    fn service(config: &PairbotConfig) -> Arc<BotService> {
        let mut discord = config.discord.clone();
        discord.token = Some("token".into());
        discord.guild_id = Some(1);
        let chat = Arc::new(DiscordChat::new(&discord).unwrap());
        Arc::new(BotService::new(
            chat,
            Arc::new(pairbot_storage::DisabledRowStore),
            ServiceSettings::from_config(config),
        ))
    }

    #[test]
    fn both_jobs_are_scheduled_by_default() {
        let mut config = PairbotConfig::default();
        config.storage.backend = StorageBackend::None;
        let scheduler = build_scheduler(&config, &service(&config)).unwrap();
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn disabled_jobs_are_not_scheduled() {
        let mut config = PairbotConfig::default();
        config.grouping.enabled = false;
        let scheduler = build_scheduler(&config, &service(&config)).unwrap();
        assert_eq!(scheduler.len(), 1);
        let upcoming = scheduler.upcoming(&chrono::Utc::now().with_timezone(&kst()));
        assert_eq!(upcoming[0].0, "fines");
    }
}

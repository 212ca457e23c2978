// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! pairbot - weekly discussion groups and participation fines for a Discord guild.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod preview;
mod serve;
mod shutdown;
mod store;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pairbot_config::PairbotConfig;
use pairbot_core::{GroupingPolicy, kst, week_start};

/// pairbot - weekly discussion groups and participation fines.
#[derive(Parser, Debug)]
#[command(name = "pairbot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to Discord and run the weekly jobs until interrupted.
    Serve,
    /// Simulate the partitioner offline and print group-size patterns.
    PreviewGroups {
        /// Number of members to partition.
        #[arg(long)]
        count: usize,
        /// Grouping policy.
        #[arg(long, default_value_t = GroupingPolicy::Groups)]
        policy: GroupingPolicy,
        /// Number of simulated runs.
        #[arg(long, default_value_t = 1000)]
        trials: usize,
        /// Seed for a reproducible simulation.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the KST week start (Monday) for an instant, default now.
    WeekStart {
        /// RFC 3339 instant, e.g. 2026-10-18T23:30:00Z.
        #[arg(long)]
        at: Option<DateTime<chrono::FixedOffset>>,
    },
    /// Validate the configuration and report every problem found.
    CheckConfig,
}

fn load_config(path: Option<&std::path::Path>) -> PairbotConfig {
    let loaded = match path {
        Some(path) => pairbot_config::load_and_validate_path(path),
        None => pairbot_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            pairbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_config(cli.config.as_deref());
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::PreviewGroups {
            count,
            policy,
            trials,
            seed,
        }) => {
            print!("{}", preview::run(count, policy, trials, seed));
        }
        Some(Commands::WeekStart { at }) => {
            let instant = at.unwrap_or_else(|| Utc::now().with_timezone(&kst()));
            println!("{}", week_start(&instant));
        }
        Some(Commands::CheckConfig) => {
            let config = load_config(cli.config.as_deref());
            println!(
                "pairbot: configuration OK (storage={:?}, grouping={}, fines={})",
                config.storage.backend, config.grouping.schedule, config.fines.schedule
            );
        }
        None => {
            println!("pairbot: use --help for available commands");
        }
    }
}

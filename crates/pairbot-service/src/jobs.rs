// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron jobs wrapping the weekly service runs.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;

use pairbot_core::calendar::{now_kst, previous_week};
use pairbot_core::{PairbotError, week_start};
use pairbot_cron::Job;

use crate::service::BotService;

/// Monday grouping: partitions, announces and records this week's groups.
pub struct GroupingJob {
    service: Arc<BotService>,
}

impl GroupingJob {
    pub fn new(service: Arc<BotService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Job for GroupingJob {
    fn name(&self) -> &str {
        "grouping"
    }

    async fn run(&self) -> Result<(), PairbotError> {
        let mut rng = StdRng::from_entropy();
        let policy = self.service.settings().scheduled;
        self.service
            .run_grouping(&policy, now_kst(), &mut rng)
            .await
            .map(|_| ())
    }
}

/// Weekly fines for the week that ended before the current one.
pub struct FineJob {
    service: Arc<BotService>,
}

impl FineJob {
    pub fn new(service: Arc<BotService>) -> Self {
        Self { service }
    }

    /// The week a run at `now` evaluates.
    pub fn reference_week(now: &DateTime<FixedOffset>) -> NaiveDate {
        previous_week(week_start(now))
    }
}

#[async_trait]
impl Job for FineJob {
    fn name(&self) -> &str {
        "fines"
    }

    async fn run(&self) -> Result<(), PairbotError> {
        let now = now_kst();
        let policy = self.service.settings().scheduled;
        self.service
            .run_fines(&policy, Self::reference_week(&now), now)
            .await
            .map(|_| ())
    }
}

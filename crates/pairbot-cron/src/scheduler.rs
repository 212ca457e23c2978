// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Scheduler`] owns the job list and spawns one timer task per job.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use croner::Cron;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, warn};

use pairbot_core::{PairbotError, kst};

/// A unit of scheduled work.
#[async_trait]
pub trait Job: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &str;

    /// Executes one occurrence. Errors are logged, never propagated.
    async fn run(&self) -> Result<(), PairbotError>;
}

/// Parses a cron expression, mapping failures to a config error.
pub fn parse_schedule(expression: &str) -> Result<Cron, PairbotError> {
    Cron::from_str(expression)
        .map_err(|e| PairbotError::Config(format!("invalid cron expression `{expression}`: {e}")))
}

/// First occurrence of `schedule` strictly after `after`, in `after`'s offset.
pub fn next_fire(schedule: &Cron, after: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    schedule.find_next_occurrence(after, false).ok()
}

struct Entry {
    expression: String,
    schedule: Cron,
    job: Arc<dyn Job>,
}

/// Registry of cron jobs, started with [`Scheduler::run`].
pub struct Scheduler {
    entries: Vec<Entry>,
    tz: FixedOffset,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// An empty scheduler evaluating schedules in KST.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            tz: kst(),
        }
    }

    /// Registers `job` to fire on `expression`.
    pub fn add(&mut self, expression: &str, job: Arc<dyn Job>) -> Result<(), PairbotError> {
        let schedule = parse_schedule(expression)?;
        debug!(job = job.name(), schedule = expression, "registered job");
        self.entries.push(Entry {
            expression: expression.to_string(),
            schedule,
            job,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next fire time of every registered job after `after`.
    pub fn upcoming(&self, after: &DateTime<FixedOffset>) -> Vec<(String, Option<DateTime<FixedOffset>>)> {
        self.entries
            .iter()
            .map(|e| (e.job.name().to_string(), next_fire(&e.schedule, after)))
            .collect()
    }

    /// Spawns one task per job. Tasks exit once `cancel` fires.
    pub fn run(self, cancel: CancellationToken) -> SchedulerHandle {
        let tz = self.tz;
        let tasks = self
            .entries
            .into_iter()
            .map(|entry| {
                info!(job = entry.job.name(), schedule = %entry.expression, "scheduling job");
                tokio::spawn(drive(entry, tz, cancel.clone()))
            })
            .collect();
        SchedulerHandle { tasks }
    }
}

/// Join handles of running job tasks.
pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Waits for every job task to finish. Cancel the token first.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                error!(error = %e, "job task panicked");
            }
        }
    }
}

async fn drive(entry: Entry, tz: FixedOffset, cancel: CancellationToken) {
    let name = entry.job.name().to_string();
    let mut last_fire: Option<DateTime<FixedOffset>> = None;

    loop {
        let now = Utc::now().with_timezone(&tz);
        let after = match last_fire {
            Some(last) if last > now => last,
            _ => now,
        };
        let Some(next) = next_fire(&entry.schedule, &after) else {
            warn!(job = %name, "schedule has no future occurrence, stopping");
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        debug!(job = %name, next = %next, "sleeping until next occurrence");

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(job = %name, "job task cancelled");
                return;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        last_fire = Some(next);
        run_occurrence(entry.job.clone()).await;
    }
}

/// Runs one occurrence on its own task so a panic cannot end the job loop.
pub(crate) async fn run_occurrence(job: Arc<dyn Job>) {
    let name = job.name().to_string();
    let occurrence = tokio::spawn(async move { run_job(job.as_ref()).await }.in_current_span());
    if let Err(e) = occurrence.await {
        error!(job = %name, error = %e, "job panicked, will run at next occurrence");
    }
}

/// Runs one occurrence and logs its outcome.
pub(crate) async fn run_job(job: &dyn Job) {
    let started = Instant::now();
    info!(job = job.name(), "job started");
    match job.run().await {
        Ok(()) => info!(
            job = job.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "job finished"
        ),
        Err(e) => error!(
            job = job.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            error = %e,
            "job failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Weekday};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_test::traced_test;

    struct Counting {
        runs: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Job for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self) -> Result<(), PairbotError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PairbotError::Internal("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    struct Panicking {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Job for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn run(&self) -> Result<(), PairbotError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            panic!("sheet exploded");
        }
    }

    fn counting(fail: bool) -> Arc<Counting> {
        Arc::new(Counting {
            runs: AtomicUsize::new(0),
            fail,
        })
    }

    #[test]
    fn monday_ten_fires_next_monday() {
        let schedule = parse_schedule("0 10 * * 1").unwrap();
        // Wednesday 2026-10-14 12:00 KST
        let after = kst().with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let next = next_fire(&schedule, &after).unwrap();
        assert_eq!(next.weekday(), Weekday::Mon);
        assert_eq!(next.date_naive().to_string(), "2026-10-19");
        assert_eq!((next.hour(), next.minute()), (10, 0));
        assert_eq!(next.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn next_fire_is_strictly_after() {
        let schedule = parse_schedule("0 9 * * 1").unwrap();
        let at = kst().with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap();
        let next = next_fire(&schedule, &at).unwrap();
        assert_eq!(next.date_naive().to_string(), "2026-10-19");
    }

    #[test]
    fn schedule_is_evaluated_in_kst_not_utc() {
        let schedule = parse_schedule("0 0 * * 1").unwrap();
        // Sunday 2026-10-18 15:30 UTC is Monday 00:30 KST.
        let after = Utc
            .with_ymd_and_hms(2026, 10, 18, 15, 30, 0)
            .unwrap()
            .with_timezone(&kst());
        let next = next_fire(&schedule, &after).unwrap();
        assert_eq!(next.date_naive().to_string(), "2026-10-26");
    }

    #[test]
    fn invalid_expression_is_rejected() {
        let mut scheduler = Scheduler::new();
        let err = scheduler.add("not a cron", counting(false)).unwrap_err();
        assert!(matches!(err, PairbotError::Config(_)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn upcoming_lists_each_job() {
        let mut scheduler = Scheduler::new();
        scheduler.add("0 9 * * 1", counting(false)).unwrap();
        scheduler.add("0 10 * * 1", counting(false)).unwrap();
        let after = kst().with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap();
        let upcoming = scheduler.upcoming(&after);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].1.unwrap().hour(), 9);
        assert_eq!(upcoming[1].1.unwrap().hour(), 10);
    }

    #[tokio::test]
    async fn cancelled_scheduler_stops_without_running_jobs() {
        let job = counting(false);
        let mut scheduler = Scheduler::new();
        scheduler.add("0 10 * * 1", job.clone()).unwrap();

        let cancel = CancellationToken::new();
        let handle = scheduler.run(cancel.clone());
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle.join())
            .await
            .unwrap();
        assert_eq!(job.runs.load(Ordering::SeqCst), 0);
    }

    #[traced_test]
    #[tokio::test]
    async fn failing_job_is_logged_not_propagated() {
        let job = counting(true);
        run_job(job.as_ref()).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
        assert!(logs_contain("job failed"));
        assert!(logs_contain("boom"));
    }

    #[traced_test]
    #[tokio::test]
    async fn successful_job_logs_completion() {
        let job = counting(false);
        run_job(job.as_ref()).await;
        assert!(logs_contain("job finished"));
    }

    #[traced_test]
    #[tokio::test]
    async fn panicking_job_runs_again_at_the_next_occurrence() {
        let job = Arc::new(Panicking {
            runs: AtomicUsize::new(0),
        });
        run_occurrence(job.clone()).await;
        run_occurrence(job.clone()).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 2);
        assert!(logs_contain("job panicked"));
    }

    #[traced_test]
    #[tokio::test]
    async fn occurrence_logs_ordinary_failures() {
        let job = counting(true);
        run_occurrence(job.clone()).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
        assert!(logs_contain("job failed"));
        assert!(!logs_contain("job panicked"));
    }
}

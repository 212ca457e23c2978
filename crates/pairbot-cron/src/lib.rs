// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron scheduling for pairbot's weekly jobs.
//!
//! Schedules are standard five-field cron expressions evaluated in Korea
//! Standard Time. A job fires at every occurrence while the process runs;
//! occurrences missed while the process was down are not replayed.

pub mod scheduler;

pub use scheduler::{Job, Scheduler, SchedulerHandle, next_fire, parse_schedule};

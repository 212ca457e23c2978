// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Week arithmetic in Korea Standard Time.
//!
//! Every week bucket in the bot is keyed by the Monday of the ISO week that
//! contains an instant, computed in KST (UTC+9) no matter which zone the host
//! runs in. Deadlines are derived from that Monday.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// KST offset from UTC in seconds.
pub const KST_OFFSET_SECS: i32 = 9 * 3600;

/// The fixed KST offset.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// The current instant in KST.
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&kst())
}

/// Returns the Monday of the ISO week containing `instant`, in KST.
pub fn week_start<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    let local = instant.with_timezone(&kst()).date_naive();
    let since_monday = local.weekday().num_days_from_monday();
    local - Duration::days(i64::from(since_monday))
}

/// The instant KST midnight begins on `date`.
pub fn kst_midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::default());
    kst().from_utc_datetime(&(local - Duration::seconds(i64::from(KST_OFFSET_SECS))))
}

/// Monday 23:59:59 KST of the week starting at `week`.
pub fn monday_deadline(week: NaiveDate) -> DateTime<FixedOffset> {
    end_of_day(week, 0)
}

/// Tuesday 23:59:59 KST of the week starting at `week`.
pub fn tuesday_deadline(week: NaiveDate) -> DateTime<FixedOffset> {
    end_of_day(week, 1)
}

fn end_of_day(week: NaiveDate, days_after_monday: i64) -> DateTime<FixedOffset> {
    kst_midnight(week) + Duration::days(days_after_monday + 1) - Duration::seconds(1)
}

/// The week start immediately before `week`.
pub fn previous_week(week: NaiveDate) -> NaiveDate {
    week - Duration::days(7)
}

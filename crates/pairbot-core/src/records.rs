// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted row types and their column codecs.
//!
//! The row store is schema-loose: every table is a list of string cells and
//! column order is fixed by the codecs below. Dates are written `YYYY-MM-DD`,
//! timestamps RFC 3339 with the KST offset. Reading back also accepts
//! `YYYY-MM-DD HH:MM:SS`, interpreted in KST. Anything else is rejected.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};

use crate::calendar::kst;
use crate::error::PairbotError;

/// One row of cells, header excluded.
pub type Row = Vec<String>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A record type with a fixed column layout.
pub trait Record: Sized {
    /// Number of columns written by [`Record::to_row`].
    const COLUMNS: usize;

    /// Encodes the record as cells in column order.
    fn to_row(&self) -> Row;

    /// Decodes a row, rejecting unparseable cells.
    ///
    /// Returns the reason as a plain string; callers attach the table name.
    fn from_row(row: &[String]) -> Result<Self, String>;

    /// Decodes a row and attaches the table name to any failure.
    fn decode(table: &str, row: &[String]) -> Result<Self, PairbotError> {
        Self::from_row(row).map_err(|reason| PairbotError::MalformedRow {
            table: table.to_string(),
            reason,
        })
    }
}

/// A group membership row written once per member per grouping event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRecord {
    pub week_start: NaiveDate,
    /// 1-based position of the group within its grouping event.
    pub group_index: u32,
    pub member_id: String,
}

/// A confirmation that `writer_id` commented on `target_id`'s post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub week_start: NaiveDate,
    pub writer_id: String,
    pub target_id: String,
    pub recorded_by_id: String,
    pub recorded_at: DateTime<FixedOffset>,
}

impl CommentRecord {
    /// The uniqueness key enforced before insert.
    pub fn key(&self) -> (NaiveDate, &str, &str) {
        (self.week_start, &self.writer_id, &self.target_id)
    }
}

/// A forum thread created by `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub week_start: NaiveDate,
    pub owner_id: String,
    pub created_at: DateTime<FixedOffset>,
}

/// A computed fine for one member and week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineRecord {
    pub week_start: NaiveDate,
    pub member_id: String,
    pub amount: u32,
    pub reasons: String,
    pub computed_at: DateTime<FixedOffset>,
}

impl Record for PairRecord {
    const COLUMNS: usize = 3;

    fn to_row(&self) -> Row {
        vec![
            format_date(self.week_start),
            self.group_index.to_string(),
            self.member_id.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let [week, index, member] = columns::<3>(row)?;
        let group_index = parse_int::<u32>("group_index", index)?;
        if group_index == 0 {
            return Err("group_index must be 1-based, got 0".to_string());
        }
        Ok(Self {
            week_start: parse_date(week)?,
            group_index,
            member_id: member.to_string(),
        })
    }
}

impl Record for CommentRecord {
    const COLUMNS: usize = 5;

    fn to_row(&self) -> Row {
        vec![
            format_date(self.week_start),
            self.writer_id.clone(),
            self.target_id.clone(),
            self.recorded_by_id.clone(),
            format_timestamp(&self.recorded_at),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let [week, writer, target, recorder, at] = columns::<5>(row)?;
        Ok(Self {
            week_start: parse_date(week)?,
            writer_id: writer.to_string(),
            target_id: target.to_string(),
            recorded_by_id: recorder.to_string(),
            recorded_at: parse_timestamp(at)?,
        })
    }
}

impl Record for PostRecord {
    const COLUMNS: usize = 3;

    fn to_row(&self) -> Row {
        vec![
            format_date(self.week_start),
            self.owner_id.clone(),
            format_timestamp(&self.created_at),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let [week, owner, at] = columns::<3>(row)?;
        Ok(Self {
            week_start: parse_date(week)?,
            owner_id: owner.to_string(),
            created_at: parse_timestamp(at)?,
        })
    }
}

impl Record for FineRecord {
    const COLUMNS: usize = 5;

    fn to_row(&self) -> Row {
        vec![
            format_date(self.week_start),
            self.member_id.clone(),
            self.amount.to_string(),
            self.reasons.clone(),
            format_timestamp(&self.computed_at),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let [week, member, amount, reasons, at] = columns::<5>(row)?;
        Ok(Self {
            week_start: parse_date(week)?,
            member_id: member.to_string(),
            amount: parse_int::<u32>("amount", amount)?,
            reasons: reasons.to_string(),
            computed_at: parse_timestamp(at)?,
        })
    }
}

/// Reads only the week column of a row, if it parses.
///
/// Used to decide whether a malformed row belongs to the week being processed.
pub fn row_week(row: &[String]) -> Option<NaiveDate> {
    row.first().and_then(|cell| parse_date(cell).ok())
}

/// Formats a week start or other date cell.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a timestamp cell as RFC 3339 in KST.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&kst())
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parses a date cell.
pub fn parse_date(cell: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(cell.trim(), DATE_FORMAT)
        .map_err(|e| format!("invalid date `{cell}`: {e}"))
}

/// Parses a timestamp cell: RFC 3339, or a naive KST `YYYY-MM-DD HH:MM:SS`.
pub fn parse_timestamp(cell: &str) -> Result<DateTime<FixedOffset>, String> {
    let trimmed = cell.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at);
    }
    NaiveDateTime::parse_from_str(trimmed, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .and_then(|naive| kst().from_local_datetime(&naive).single())
        .ok_or_else(|| format!("invalid timestamp `{cell}`"))
}

fn parse_int<T: std::str::FromStr>(column: &str, cell: &str) -> Result<T, String> {
    cell.trim()
        .parse::<T>()
        .map_err(|_| format!("invalid {column} `{cell}`"))
}

/// Borrows exactly the first `N` cells; extra trailing cells are ignored.
fn columns<const N: usize>(row: &[String]) -> Result<[&str; N], String> {
    if row.len() < N {
        return Err(format!("expected {N} columns, found {}", row.len()));
    }
    Ok(std::array::from_fn(|i| row[i].as_str()))
}

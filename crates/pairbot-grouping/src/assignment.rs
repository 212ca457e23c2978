// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flattening groups into Pair Records and reading them back.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use pairbot_core::PairRecord;

/// Flattens one grouping event into rows, one per member.
///
/// `group_index` is the 1-based emission position of each group.
pub fn to_pair_records(week_start: NaiveDate, groups: &[Vec<String>]) -> Vec<PairRecord> {
    groups
        .iter()
        .zip(1u32..)
        .flat_map(|(group, group_index)| {
            group.iter().map(move |member_id| PairRecord {
                week_start,
                group_index,
                member_id: member_id.clone(),
            })
        })
        .collect()
}

/// Reassembles groups keyed by `(week_start, group_index)`.
///
/// Member order within a group follows record order.
pub fn regroup(records: &[PairRecord]) -> BTreeMap<(NaiveDate, u32), Vec<String>> {
    let mut groups: BTreeMap<(NaiveDate, u32), Vec<String>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.week_start, record.group_index))
            .or_default()
            .push(record.member_id.clone());
    }
    groups
}

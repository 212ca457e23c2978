// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shuffle-and-slice partitioning.

use pairbot_core::GroupingPolicy;
use rand::Rng;

use crate::policy::{GroupStep, next_group_size};

/// Shuffles `items` in place with Fisher–Yates.
///
/// Walks `i` from the last index down to 1, swapping with a uniform index in
/// `[0, i]`. The draw order is fixed so seeded runs are reproducible.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Partitions `members` into randomized groups under `policy`.
///
/// Groups are returned in emission order; a group's 1-based position is its
/// `group_index`. An empty roster yields no groups and a one-member roster
/// yields a single singleton. Otherwise no group has size 1. Under
/// [`GroupingPolicy::Groups`] the tail merge can produce a group of 4 when
/// the preceding group already held 3.
pub fn partition<T, R>(members: &[T], policy: GroupingPolicy, rng: &mut R) -> Vec<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut pool = members.to_vec();
    shuffle(&mut pool, rng);

    let mut remaining = pool.len();
    let mut rest = pool.into_iter();
    let mut groups: Vec<Vec<T>> = Vec::new();

    loop {
        match next_group_size(remaining, !groups.is_empty(), policy, rng) {
            GroupStep::Stop => break,
            GroupStep::MergeIntoPrevious => {
                if let (Some(last), Some(member)) = (groups.last_mut(), rest.next()) {
                    last.push(member);
                }
                break;
            }
            GroupStep::Take(size) => {
                groups.push(rest.by_ref().take(size).collect());
                remaining -= size;
            }
        }
    }

    groups
}

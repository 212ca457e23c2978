// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pairbot preview-groups`: offline partitioner simulation.

use std::collections::HashMap;
use std::fmt::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pairbot_core::GroupingPolicy;
use pairbot_grouping::partition;

/// Group sizes of one run, largest first, e.g. `3+2+2`.
fn pattern(groups: &[Vec<usize>]) -> String {
    let mut sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

/// Counts how often each size pattern occurs over `trials` partitions of
/// `count` members, most frequent first (ties by pattern).
pub fn distribution<R: Rng + ?Sized>(
    count: usize,
    policy: GroupingPolicy,
    trials: usize,
    rng: &mut R,
) -> Vec<(String, usize)> {
    let members: Vec<usize> = (1..=count).collect();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..trials {
        let groups = partition(&members, policy, rng);
        *counts.entry(pattern(&groups)).or_default() += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Renders a sample partition plus the pattern distribution.
pub fn run(count: usize, policy: GroupingPolicy, trials: usize, seed: Option<u64>) -> String {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let members: Vec<usize> = (1..=count).collect();

    let mut out = String::new();
    let _ = writeln!(out, "{count} members, policy {policy}");
    let _ = writeln!(out, "sample:");
    for (i, group) in partition(&members, policy, &mut rng).iter().enumerate() {
        let ids: Vec<String> = group.iter().map(|m| format!("member{m}")).collect();
        let _ = writeln!(out, "  group {} ({}): {}", i + 1, group.len(), ids.join(", "));
    }

    let _ = writeln!(out, "patterns over {trials} runs:");
    for (pattern, n) in distribution(count, policy, trials, &mut rng) {
        let share = if trials == 0 { 0.0 } else { n as f64 * 100.0 / trials as f64 };
        let _ = writeln!(out, "  {pattern}: {n}/{trials} ({share:.1}%)");
    }
    out
}

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group size decision table.
//!
//! [`size_rule`] is the deterministic table keyed by the remaining member
//! count; [`next_group_size`] resolves its one random branch. Keeping the two
//! apart lets the table be tested exhaustively.

use pairbot_core::GroupingPolicy;
use rand::Rng;

/// What the table says to do with `remaining` members left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// Nothing left.
    Stop,
    /// One member left after at least one group: append to the previous group.
    MergeIntoPrevious,
    /// Take exactly this many.
    Exactly(usize),
    /// Take 2 or 3, chosen uniformly.
    TwoOrThree,
}

/// A resolved step of the partition loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStep {
    Stop,
    MergeIntoPrevious,
    Take(usize),
}

/// Looks up the size rule for `remaining` members.
///
/// `has_previous` is whether a group has already been emitted in this run.
pub fn size_rule(remaining: usize, has_previous: bool, policy: GroupingPolicy) -> SizeRule {
    match (policy, remaining) {
        (_, 0) => SizeRule::Stop,
        (_, 1) if has_previous => SizeRule::MergeIntoPrevious,
        (_, 1) => SizeRule::Exactly(1),
        (GroupingPolicy::Pairs, _) => SizeRule::Exactly(2),
        (GroupingPolicy::Groups, n @ (2 | 3)) => SizeRule::Exactly(n),
        (GroupingPolicy::Groups, 4) => SizeRule::Exactly(2),
        (GroupingPolicy::Groups, 5) => SizeRule::TwoOrThree,
        // Odd counts take 3 so an even number remains.
        (GroupingPolicy::Groups, n) if n % 2 == 1 => SizeRule::Exactly(3),
        (GroupingPolicy::Groups, _) => SizeRule::TwoOrThree,
    }
}

/// Resolves the next step, drawing from `rng` only for [`SizeRule::TwoOrThree`].
pub fn next_group_size<R: Rng + ?Sized>(
    remaining: usize,
    has_previous: bool,
    policy: GroupingPolicy,
    rng: &mut R,
) -> GroupStep {
    match size_rule(remaining, has_previous, policy) {
        SizeRule::Stop => GroupStep::Stop,
        SizeRule::MergeIntoPrevious => GroupStep::MergeIntoPrevious,
        SizeRule::Exactly(size) => GroupStep::Take(size),
        SizeRule::TwoOrThree => GroupStep::Take(if rng.gen_bool(0.5) { 2 } else { 3 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use GroupingPolicy::{Groups, Pairs};

    #[test]
    fn groups_table_is_exhaustive_for_small_counts() {
        let expected = [
            (0, false, SizeRule::Stop),
            (0, true, SizeRule::Stop),
            (1, false, SizeRule::Exactly(1)),
            (1, true, SizeRule::MergeIntoPrevious),
            (2, false, SizeRule::Exactly(2)),
            (2, true, SizeRule::Exactly(2)),
            (3, false, SizeRule::Exactly(3)),
            (3, true, SizeRule::Exactly(3)),
            (4, false, SizeRule::Exactly(2)),
            (4, true, SizeRule::Exactly(2)),
            (5, false, SizeRule::TwoOrThree),
            (5, true, SizeRule::TwoOrThree),
            (6, false, SizeRule::TwoOrThree),
            (7, false, SizeRule::Exactly(3)),
            (8, true, SizeRule::TwoOrThree),
            (9, true, SizeRule::Exactly(3)),
        ];
        for (remaining, has_previous, rule) in expected {
            assert_eq!(
                size_rule(remaining, has_previous, Groups),
                rule,
                "remaining={remaining} has_previous={has_previous}"
            );
        }
    }

    #[test]
    fn groups_table_for_large_counts_follows_parity() {
        for n in 6..200 {
            let rule = size_rule(n, true, Groups);
            if n % 2 == 1 {
                assert_eq!(rule, SizeRule::Exactly(3), "n={n}");
            } else {
                assert_eq!(rule, SizeRule::TwoOrThree, "n={n}");
            }
        }
    }

    #[test]
    fn pairs_table_always_takes_two() {
        assert_eq!(size_rule(0, true, Pairs), SizeRule::Stop);
        assert_eq!(size_rule(1, false, Pairs), SizeRule::Exactly(1));
        assert_eq!(size_rule(1, true, Pairs), SizeRule::MergeIntoPrevious);
        for n in 2..100 {
            assert_eq!(size_rule(n, n % 2 == 0, Pairs), SizeRule::Exactly(2), "n={n}");
        }
    }

    #[test]
    fn random_branch_only_yields_two_or_three() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            match next_group_size(6, true, Groups, &mut rng) {
                GroupStep::Take(2) | GroupStep::Take(3) => {}
                other => panic!("unexpected step {other:?}"),
            }
        }
    }

    #[test]
    fn deterministic_rules_resolve_without_randomness() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(next_group_size(4, false, Groups, &mut rng), GroupStep::Take(2));
        assert_eq!(next_group_size(7, true, Groups, &mut rng), GroupStep::Take(3));
        assert_eq!(next_group_size(1, true, Groups, &mut rng), GroupStep::MergeIntoPrevious);
        assert_eq!(next_group_size(0, true, Pairs, &mut rng), GroupStep::Stop);
    }
}

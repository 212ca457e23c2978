// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly group partitioning.
//!
//! A roster is shuffled and sliced into groups by a size policy that looks
//! at how many members remain, so nobody is left alone unless the roster is
//! a single member. Two policies exist:
//!
//! - [`GroupingPolicy::Groups`]: groups of 2 or 3.
//! - [`GroupingPolicy::Pairs`]: strict pairs, a leftover joins the last pair.
//!
//! The policy itself is the decision table in [`policy`]; [`partition`]
//! only shuffles and slices.

pub mod assignment;
pub mod partition;
pub mod policy;
pub mod roster;

pub use assignment::{regroup, to_pair_records};
pub use pairbot_core::GroupingPolicy;
pub use partition::{partition, shuffle};
pub use policy::{GroupStep, SizeRule, next_group_size, size_rule};
pub use roster::eligible_roster;

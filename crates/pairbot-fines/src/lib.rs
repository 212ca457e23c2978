// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weekly fine evaluation.
//!
//! Every roster member owes a fine for a week if they did not confirm a
//! comment, or if their first forum post of the week was missing or late.
//! The evaluation is a pure function of already-fetched rows: it never reads
//! the store or the clock.

pub mod evaluator;
pub mod rules;

pub use evaluator::{FineAssessment, duplicate_comment_keys, evaluate};
pub use rules::{
    COMMENT_MISSING_FINE, FineReason, POST_LATE_FINE, POST_MISSING_FINE, PostStatus, post_status,
};

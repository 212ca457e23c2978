// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fine amounts and the post deadline rule.

use chrono::{DateTime, FixedOffset, NaiveDate};
use pairbot_core::calendar::{monday_deadline, tuesday_deadline};
use strum::Display;

/// Fine for not confirming any comment during the week.
pub const COMMENT_MISSING_FINE: u32 = 1000;
/// Fine for no post, or a post after the Tuesday deadline.
pub const POST_MISSING_FINE: u32 = 5000;
/// Fine for a post after Monday but by Tuesday.
pub const POST_LATE_FINE: u32 = 1000;

/// Why a member was fined. Displays as the text stored in Fine Records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FineReason {
    #[strum(serialize = "comment missing")]
    CommentMissing,
    #[strum(serialize = "post missing")]
    PostMissing,
    #[strum(serialize = "post late")]
    PostLate,
    #[strum(serialize = "post overdue")]
    PostOverdue,
}

impl FineReason {
    /// The amount this reason contributes.
    pub fn amount(self) -> u32 {
        match self {
            Self::CommentMissing => COMMENT_MISSING_FINE,
            Self::PostMissing | Self::PostOverdue => POST_MISSING_FINE,
            Self::PostLate => POST_LATE_FINE,
        }
    }
}

/// Where a member's first post of the week falls against the deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    /// At or before Monday 23:59:59 KST.
    OnTime,
    /// After Monday, at or before Tuesday 23:59:59 KST.
    Late,
    /// After Tuesday 23:59:59 KST.
    Overdue,
    /// No post this week.
    Missing,
}

impl PostStatus {
    /// The fine reason for this status, if any.
    pub fn reason(self) -> Option<FineReason> {
        match self {
            Self::OnTime => None,
            Self::Late => Some(FineReason::PostLate),
            Self::Overdue => Some(FineReason::PostOverdue),
            Self::Missing => Some(FineReason::PostMissing),
        }
    }

    /// The fine owed for this status.
    pub fn fine(self) -> u32 {
        self.reason().map_or(0, FineReason::amount)
    }
}

/// Classifies the first post of `week` against that week's deadlines.
pub fn post_status(week: NaiveDate, first_post: Option<&DateTime<FixedOffset>>) -> PostStatus {
    match first_post {
        None => PostStatus::Missing,
        Some(at) if *at <= monday_deadline(week) => PostStatus::OnTime,
        Some(at) if *at <= tuesday_deadline(week) => PostStatus::Late,
        Some(_) => PostStatus::Overdue,
    }
}

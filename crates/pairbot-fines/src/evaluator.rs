// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-member fine evaluation for one week.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate};
use pairbot_core::{CommentRecord, FineRecord, PostRecord};

use crate::rules::{FineReason, post_status};

/// Separator used when reasons are stored as one cell.
const REASON_SEPARATOR: &str = ", ";

/// A member who owes something for the evaluated week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineAssessment {
    pub member_id: String,
    pub amount: u32,
    /// Comment reason first, then post reason.
    pub reasons: Vec<FineReason>,
}

impl FineAssessment {
    /// Reasons joined as they are stored and announced.
    pub fn reason_text(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR)
    }

    /// Builds the persisted row for this assessment.
    pub fn to_record(&self, week_start: NaiveDate, computed_at: DateTime<FixedOffset>) -> FineRecord {
        FineRecord {
            week_start,
            member_id: self.member_id.clone(),
            amount: self.amount,
            reasons: self.reason_text(),
            computed_at,
        }
    }
}

/// Evaluates fines for `week` over `roster`, in roster order.
///
/// Rows for other weeks are ignored. Members owing nothing are omitted.
pub fn evaluate(
    week: NaiveDate,
    roster: &[String],
    comments: &[CommentRecord],
    posts: &[PostRecord],
) -> Vec<FineAssessment> {
    let commented: HashSet<&str> = comments
        .iter()
        .filter(|c| c.week_start == week)
        .map(|c| c.writer_id.as_str())
        .collect();

    let mut first_post: HashMap<&str, &DateTime<FixedOffset>> = HashMap::new();
    for post in posts.iter().filter(|p| p.week_start == week) {
        first_post
            .entry(post.owner_id.as_str())
            .and_modify(|earliest| {
                if post.created_at < **earliest {
                    *earliest = &post.created_at;
                }
            })
            .or_insert(&post.created_at);
    }

    roster
        .iter()
        .filter_map(|member| {
            let mut reasons = Vec::new();
            if !commented.contains(member.as_str()) {
                reasons.push(FineReason::CommentMissing);
            }
            let status = post_status(week, first_post.get(member.as_str()).copied());
            reasons.extend(status.reason());

            if reasons.is_empty() {
                return None;
            }
            Some(FineAssessment {
                member_id: member.clone(),
                amount: reasons.iter().map(|r| r.amount()).sum(),
                reasons,
            })
        })
        .collect()
}

/// Returns `(writer, target)` keys recorded more than once for `week`.
///
/// Duplicates can slip in when two processes check-then-insert concurrently.
/// They never change the fine outcome but are worth logging.
pub fn duplicate_comment_keys(week: NaiveDate, comments: &[CommentRecord]) -> Vec<(String, String)> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut order = Vec::new();
    for comment in comments.iter().filter(|c| c.week_start == week) {
        let key = (comment.writer_id.as_str(), comment.target_id.as_str());
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(key);
        }
    }
    order
        .into_iter()
        .map(|(writer, target)| (writer.to_string(), target.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{COMMENT_MISSING_FINE, POST_LATE_FINE, POST_MISSING_FINE};

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn comment(week: NaiveDate, writer: &str, target: &str) -> CommentRecord {
        CommentRecord {
            week_start: week,
            writer_id: writer.into(),
            target_id: target.into(),
            recorded_by_id: writer.into(),
            recorded_at: at("2026-10-14T20:00:00+09:00"),
        }
    }

    fn post(week: NaiveDate, owner: &str, created_at: &str) -> PostRecord {
        PostRecord {
            week_start: week,
            owner_id: owner.into(),
            created_at: at(created_at),
        }
    }

    fn roster(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn three_member_scenario() {
        let roster = roster(&["diligent", "no-post", "absent"]);
        let comments = vec![comment(week(), "diligent", "no-post"), comment(week(), "no-post", "diligent")];
        let posts = vec![post(week(), "diligent", "2026-10-12T21:00:00+09:00")];

        let fines = evaluate(week(), &roster, &comments, &posts);

        assert_eq!(
            fines,
            vec![
                FineAssessment {
                    member_id: "no-post".into(),
                    amount: 5000,
                    reasons: vec![FineReason::PostMissing],
                },
                FineAssessment {
                    member_id: "absent".into(),
                    amount: 6000,
                    reasons: vec![FineReason::CommentMissing, FineReason::PostMissing],
                },
            ]
        );
        assert_eq!(fines[0].reason_text(), "post missing");
        assert_eq!(fines[1].reason_text(), "comment missing, post missing");
    }

    #[test]
    fn earliest_post_decides() {
        let roster = roster(&["a"]);
        let comments = vec![comment(week(), "a", "b")];
        let posts = vec![
            post(week(), "a", "2026-10-15T09:00:00+09:00"),
            post(week(), "a", "2026-10-13T09:00:00+09:00"),
            post(week(), "a", "2026-10-14T09:00:00+09:00"),
        ];
        let fines = evaluate(week(), &roster, &comments, &posts);
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].amount, POST_LATE_FINE);
        assert_eq!(fines[0].reasons, vec![FineReason::PostLate]);
    }

    #[test]
    fn late_post_and_missing_comment_total_two_thousand() {
        let roster = roster(&["a"]);
        let posts = vec![post(week(), "a", "2026-10-13T12:00:00+09:00")];
        let fines = evaluate(week(), &roster, &[], &posts);
        assert_eq!(fines[0].amount, COMMENT_MISSING_FINE + POST_LATE_FINE);
        assert_eq!(fines[0].reason_text(), "comment missing, post late");
    }

    #[test]
    fn rows_from_other_weeks_are_ignored() {
        let last_week = week() - chrono::Duration::days(7);
        let roster = roster(&["a"]);
        let comments = vec![comment(last_week, "a", "b")];
        let posts = vec![post(last_week, "a", "2026-10-05T09:00:00+09:00")];
        let fines = evaluate(week(), &roster, &comments, &posts);
        assert_eq!(fines[0].amount, COMMENT_MISSING_FINE + POST_MISSING_FINE);
    }

    #[test]
    fn commenting_on_someone_counts_for_the_writer_only() {
        let roster = roster(&["writer", "target"]);
        let comments = vec![comment(week(), "writer", "target")];
        let posts = vec![
            post(week(), "writer", "2026-10-12T08:00:00+09:00"),
            post(week(), "target", "2026-10-12T08:00:00+09:00"),
        ];
        let fines = evaluate(week(), &roster, &comments, &posts);
        assert_eq!(fines.len(), 1);
        assert_eq!(fines[0].member_id, "target");
        assert_eq!(fines[0].reasons, vec![FineReason::CommentMissing]);
    }

    #[test]
    fn members_outside_the_roster_are_never_fined() {
        let fines = evaluate(week(), &[], &[], &[post(week(), "ghost", "2026-10-16T09:00:00+09:00")]);
        assert!(fines.is_empty());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let roster = roster(&["a", "b", "c", "d"]);
        let comments = vec![comment(week(), "b", "a"), comment(week(), "d", "c")];
        let posts = vec![
            post(week(), "a", "2026-10-13T01:00:00+09:00"),
            post(week(), "c", "2026-10-20T01:00:00+09:00"),
        ];
        let first = evaluate(week(), &roster, &comments, &posts);
        for _ in 0..5 {
            assert_eq!(evaluate(week(), &roster, &comments, &posts), first);
        }
    }

    #[test]
    fn assessment_becomes_a_fine_record() {
        let assessment = FineAssessment {
            member_id: "a".into(),
            amount: 2000,
            reasons: vec![FineReason::CommentMissing, FineReason::PostLate],
        };
        let computed_at = at("2026-10-19T09:00:00+09:00");
        let record = assessment.to_record(week(), computed_at);
        assert_eq!(record.amount, 2000);
        assert_eq!(record.reasons, "comment missing, post late");
        assert_eq!(record.week_start, week());
        assert_eq!(record.computed_at, computed_at);
    }

    #[test]
    fn duplicate_keys_are_reported_once() {
        let comments = vec![
            comment(week(), "a", "b"),
            comment(week(), "a", "b"),
            comment(week(), "a", "b"),
            comment(week(), "a", "c"),
            comment(week() - chrono::Duration::days(7), "x", "y"),
            comment(week() - chrono::Duration::days(7), "x", "y"),
        ];
        assert_eq!(
            duplicate_comment_keys(week(), &comments),
            vec![("a".to_string(), "b".to_string())]
        );
    }
}

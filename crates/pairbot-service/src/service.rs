// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`BotService`]: the grouping run, the fine run and record keeping.
//!
//! Every external call goes through [`retry`] with either the scheduled
//! policy (timeouts plus retries) or the interactive policy (timeout only).

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use pairbot_core::records::row_week;
use pairbot_core::{
    ChannelId, ChatPlatform, CommentRecord, PairbotError, PostRecord, Record, RetryPolicy, Row,
    RowStore, kst, retry, week_start,
};
use pairbot_fines::{FineAssessment, duplicate_comment_keys, evaluate};
use pairbot_grouping::{eligible_roster, partition, to_pair_records};

use crate::announce::{DISCORD_MESSAGE_LIMIT, format_fines, format_groups, mention, split_message};
use crate::command::{Command, user_message};
use crate::settings::ServiceSettings;

/// Result of one grouping run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingOutcome {
    pub week_start: NaiveDate,
    pub groups: Vec<Vec<String>>,
    pub announced: bool,
    /// Pair Records appended.
    pub recorded: usize,
}

/// Result of one fine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineOutcome {
    pub week_start: NaiveDate,
    pub assessments: Vec<FineAssessment>,
    /// Fine Records appended.
    pub recorded: usize,
    /// Malformed rows from other weeks that were ignored.
    pub skipped_rows: usize,
    /// Comment keys recorded more than once for the week.
    pub duplicate_comments: usize,
    pub announced: bool,
}

/// Result of `/comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Recorded(CommentRecord),
    AlreadyRecorded,
}

/// Platform-independent bot logic.
pub struct BotService {
    chat: Arc<dyn ChatPlatform>,
    store: Arc<dyn RowStore>,
    settings: ServiceSettings,
    /// Serializes the comment check-then-insert within this process.
    comment_lock: Mutex<()>,
}

impl BotService {
    pub fn new(
        chat: Arc<dyn ChatPlatform>,
        store: Arc<dyn RowStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            chat,
            store,
            settings,
            comment_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    async fn roster(&self, policy: &RetryPolicy) -> Result<Vec<String>, PairbotError> {
        let members = retry(policy, "fetch_guild_members", || {
            self.chat.fetch_guild_members()
        })
        .await?;
        Ok(eligible_roster(&members, self.settings.required_role))
    }

    async fn announce(
        &self,
        channel: ChannelId,
        text: &str,
        policy: &RetryPolicy,
    ) -> Result<(), PairbotError> {
        for chunk in split_message(text, DISCORD_MESSAGE_LIMIT) {
            retry(policy, "send_message", || self.chat.send_message(channel, &chunk)).await?;
        }
        Ok(())
    }

    async fn append(
        &self,
        table: &str,
        row: Row,
        policy: &RetryPolicy,
    ) -> Result<(), PairbotError> {
        retry(policy, "append_row", || self.store.append_row(table, row.clone())).await
    }

    async fn read(&self, table: &str, policy: &RetryPolicy) -> Result<Vec<Row>, PairbotError> {
        retry(policy, "get_rows", || self.store.get_rows(table)).await
    }

    /// Partitions the current roster, announces the groups and records them.
    ///
    /// An empty roster is logged and produces no announcement.
    pub async fn run_grouping<R>(
        &self,
        policy: &RetryPolicy,
        now: DateTime<FixedOffset>,
        rng: &mut R,
    ) -> Result<GroupingOutcome, PairbotError>
    where
        R: Rng + Send + ?Sized,
    {
        let week = week_start(&now);
        let roster = self.roster(policy).await?;
        if roster.is_empty() {
            warn!(%week, "no eligible members, skipping grouping");
            return Ok(GroupingOutcome {
                week_start: week,
                groups: Vec::new(),
                announced: false,
                recorded: 0,
            });
        }

        let groups = partition(&roster, self.settings.policy, rng);
        info!(
            %week,
            members = roster.len(),
            groups = groups.len(),
            policy = %self.settings.policy,
            "partitioned roster"
        );

        let announced = match self.settings.announce_channel {
            Some(channel) => {
                self.announce(channel, &format_groups(&groups), policy).await?;
                true
            }
            None => {
                warn!("no announce channel configured, groups not announced");
                false
            }
        };

        let mut recorded = 0;
        if self.settings.record_pairs {
            for record in to_pair_records(week, &groups) {
                self.append(&self.settings.tables.pairs, record.to_row(), policy)
                    .await?;
                recorded += 1;
            }
            debug!(%week, rows = recorded, "recorded pair assignments");
        }

        Ok(GroupingOutcome {
            week_start: week,
            groups,
            announced,
            recorded,
        })
    }

    /// Evaluates, records and announces fines for the week starting `week`.
    ///
    /// Aborts before writing anything when a row of `week` cannot be decoded.
    pub async fn run_fines(
        &self,
        policy: &RetryPolicy,
        week: NaiveDate,
        now: DateTime<FixedOffset>,
    ) -> Result<FineOutcome, PairbotError> {
        let tables = &self.settings.tables;
        let roster = self.roster(policy).await?;
        let comment_rows = self.read(&tables.comments, policy).await?;
        let post_rows = self.read(&tables.posts, policy).await?;

        let (comments, skipped_comments) =
            decode_week_rows::<CommentRecord>(&tables.comments, &comment_rows, week)?;
        let (posts, skipped_posts) = decode_week_rows::<PostRecord>(&tables.posts, &post_rows, week)?;

        let duplicates = duplicate_comment_keys(week, &comments);
        for (writer, target) in &duplicates {
            warn!(%week, writer, target, "comment recorded more than once");
        }

        let assessments = evaluate(week, &roster, &comments, &posts);
        info!(
            %week,
            roster = roster.len(),
            comments = comments.len(),
            posts = posts.len(),
            fined = assessments.len(),
            "evaluated fines"
        );

        let mut recorded = 0;
        if self.settings.record_fines {
            for assessment in &assessments {
                let row = assessment.to_record(week, now).to_row();
                self.append(&tables.fines, row, policy).await?;
                recorded += 1;
            }
        }

        let announced = match self.settings.fines_channel {
            Some(channel) => {
                self.announce(channel, &format_fines(week, &assessments), policy)
                    .await?;
                true
            }
            None => {
                warn!("no fines channel configured, summary not announced");
                false
            }
        };

        Ok(FineOutcome {
            week_start: week,
            assessments,
            recorded,
            skipped_rows: skipped_comments + skipped_posts,
            duplicate_comments: duplicates.len(),
            announced,
        })
    }

    /// Records that `writer` (default: `invoker`) commented on `target`'s
    /// post this week, unless that comment is already on record.
    pub async fn record_comment(
        &self,
        invoker: &str,
        writer: Option<&str>,
        target: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<CommentOutcome, PairbotError> {
        let writer = writer.unwrap_or(invoker);
        if target.trim().is_empty() {
            return Err(PairbotError::InvalidInput(
                "Please choose whose post was commented on.".into(),
            ));
        }
        if writer == target {
            return Err(PairbotError::InvalidInput(
                "A comment on your own post does not count.".into(),
            ));
        }

        let week = week_start(&now);
        let policy = self.settings.interactive;
        let table = &self.settings.tables.comments;

        let _guard = self.comment_lock.lock().await;
        let rows = self.read(table, &policy).await?;
        // Compare raw cells so a row with a broken timestamp still counts.
        let exists = rows.iter().any(|row| {
            row.len() >= 3 && row_week(row) == Some(week) && row[1] == writer && row[2] == target
        });
        if exists {
            info!(%week, writer, target, "comment already recorded");
            return Ok(CommentOutcome::AlreadyRecorded);
        }

        let record = CommentRecord {
            week_start: week,
            writer_id: writer.to_string(),
            target_id: target.to_string(),
            recorded_by_id: invoker.to_string(),
            recorded_at: now,
        };
        self.append(table, record.to_row(), &policy).await?;
        info!(%week, writer, target, recorded_by = invoker, "recorded comment");
        Ok(CommentOutcome::Recorded(record))
    }

    /// Records a forum thread as a weekly post when it was opened in the
    /// configured forum channel. Returns `None` for any other thread.
    pub async fn record_post(
        &self,
        owner: &str,
        parent_channel: Option<u64>,
        created_at: DateTime<FixedOffset>,
    ) -> Result<Option<PostRecord>, PairbotError> {
        let Some(forum) = self.settings.forum_channel else {
            return Ok(None);
        };
        if parent_channel != Some(forum) {
            debug!(?parent_channel, "thread outside the forum channel, ignored");
            return Ok(None);
        }

        let created_at = created_at.with_timezone(&kst());
        let record = PostRecord {
            week_start: week_start(&created_at),
            owner_id: owner.to_string(),
            created_at,
        };
        self.append(
            &self.settings.tables.posts,
            record.to_row(),
            &self.settings.scheduled,
        )
        .await?;
        info!(week = %record.week_start, owner, "recorded forum post");
        Ok(Some(record))
    }

    /// Runs a slash command and returns the reply text. Never fails.
    pub async fn handle_command(
        &self,
        invoker: &str,
        command: Command,
        now: DateTime<FixedOffset>,
    ) -> String {
        let name = command.name();
        let result = match command {
            Command::Pair => self.pair_now(now).await,
            Command::Comment { writer, target } => self
                .record_comment(invoker, writer.as_deref(), &target, now)
                .await
                .map(|outcome| comment_reply(&outcome, week_start(&now))),
        };

        match result {
            Ok(reply) => reply,
            Err(e @ PairbotError::InvalidInput(_)) => {
                info!(command = name, invoker, error = %e, "rejected command input");
                user_message(&e)
            }
            Err(e) => {
                error!(command = name, invoker, error = %e, "command failed");
                user_message(&e)
            }
        }
    }

    async fn pair_now(&self, now: DateTime<FixedOffset>) -> Result<String, PairbotError> {
        let mut rng = StdRng::from_entropy();
        let policy = self.settings.interactive;
        let outcome = self.run_grouping(&policy, now, &mut rng).await?;
        Ok(match (outcome.groups.len(), outcome.announced) {
            (0, _) => "🤷 There is nobody to group right now.".to_string(),
            (n, true) => format!("✅ Posted {n} groups for the week of {}.", outcome.week_start),
            (n, false) => format!(
                "✅ Formed {n} groups for the week of {}, but no announce channel is set.",
                outcome.week_start
            ),
        })
    }
}

fn comment_reply(outcome: &CommentOutcome, week: NaiveDate) -> String {
    match outcome {
        CommentOutcome::Recorded(record) => format!(
            "📝 Recorded {}'s comment on {}'s post for the week of {week}.",
            mention(&record.writer_id),
            mention(&record.target_id)
        ),
        CommentOutcome::AlreadyRecorded => {
            format!("👌 That comment is already recorded for the week of {week}.")
        }
    }
}

/// Decodes `rows` of `table` for a fine run over `week`.
///
/// A row that fails to decode is fatal when it belongs to `week` or when its
/// week cell is unreadable; otherwise it is logged and skipped. Returns the
/// decoded records and the number of skipped rows.
pub fn decode_week_rows<T: Record>(
    table: &str,
    rows: &[Row],
    week: NaiveDate,
) -> Result<(Vec<T>, usize), PairbotError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for (index, row) in rows.iter().enumerate() {
        match T::decode(table, row) {
            Ok(record) => records.push(record),
            Err(e) => match row_week(row) {
                Some(other) if other != week => {
                    warn!(table, index, week = %other, error = %e, "skipping malformed row");
                    skipped += 1;
                }
                _ => {
                    error!(table, index, %week, error = %e, "malformed row in evaluated week");
                    return Err(e);
                }
            },
        }
    }
    Ok((records, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tracing_test::traced_test;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[traced_test]
    #[test]
    fn malformed_row_from_other_week_is_skipped() {
        let rows = vec![
            row(&["2026-10-05", "1", "2026-10-05T10:00:00+09:00"]),
            row(&["2026-09-28", "2", "yesterday"]),
        ];
        let (posts, skipped) =
            decode_week_rows::<PostRecord>("Posts", &rows, date("2026-10-05")).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(skipped, 1);
        assert!(logs_contain("skipping malformed row"));
    }

    #[traced_test]
    #[test]
    fn malformed_row_in_evaluated_week_aborts() {
        let rows = vec![row(&["2026-10-05", "2", "yesterday"])];
        let err = decode_week_rows::<PostRecord>("Posts", &rows, date("2026-10-05")).unwrap_err();
        assert!(matches!(err, PairbotError::MalformedRow { .. }));
        assert!(logs_contain("malformed row in evaluated week"));
    }

    #[test]
    fn unreadable_week_cell_aborts() {
        let rows = vec![row(&["last monday", "2", "2026-10-05T10:00:00+09:00"])];
        assert!(decode_week_rows::<PostRecord>("Posts", &rows, date("2026-10-05")).is_err());
    }

    #[test]
    fn comment_reply_mentions_both_members() {
        let week = date("2026-10-12");
        let record = CommentRecord {
            week_start: week,
            writer_id: "1".into(),
            target_id: "2".into(),
            recorded_by_id: "1".into(),
            recorded_at: kst().from_local_datetime(&week.and_hms_opt(12, 0, 0).unwrap()).unwrap(),
        };
        let reply = comment_reply(&CommentOutcome::Recorded(record), week);
        assert!(reply.contains("<@1>'s comment on <@2>'s post"));
    }
}

// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Announcement text for group assignments and fine summaries.

use std::fmt::Write;

use chrono::NaiveDate;
use pairbot_fines::FineAssessment;

/// Discord rejects messages longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Group line markers, cycled by group position.
pub const GROUP_EMOJIS: [&str; 6] = ["👥", "🤝", "💪", "✨", "🌟", "🚀"];

const GROUPS_HEADER: &str = "🎉 This week's groups are in!";
const GROUPS_FOOTER: &str = "💬 Don't forget to submit your comments today!\n🔥 You've got this!";

/// Discord mention markup for a user id.
pub fn mention(id: &str) -> String {
    format!("<@{id}>")
}

/// One line per group, 1-based, between a header and a reminder.
pub fn format_groups(groups: &[Vec<String>]) -> String {
    let mut text = format!("{GROUPS_HEADER}\n\n");
    for (i, group) in groups.iter().enumerate() {
        let emoji = GROUP_EMOJIS[i % GROUP_EMOJIS.len()];
        let mentions = group
            .iter()
            .map(|id| mention(id))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            text,
            "{emoji} **Group {}** ({}): {mentions}",
            i + 1,
            group.len()
        );
    }
    text.push('\n');
    text.push_str(GROUPS_FOOTER);
    text
}

/// Fine summary for `week`, in evaluation (roster) order.
pub fn format_fines(week: NaiveDate, assessments: &[FineAssessment]) -> String {
    let mut text = format!("💸 Fines for the week of {week}\n\n");
    if assessments.is_empty() {
        text.push_str("🎉 No fines this week. Everyone made it!");
        return text;
    }
    for a in assessments {
        let _ = writeln!(
            text,
            "• {}: {} won ({})",
            mention(&a.member_id),
            a.amount,
            a.reason_text()
        );
    }
    let total: u32 = assessments.iter().map(|a| a.amount).sum();
    let _ = write!(text, "\nTotal: {total} won from {} members", assessments.len());
    text
}

/// Splits `text` on line boundaries into chunks of at most `limit` chars.
///
/// A single line longer than `limit` is cut at character boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let sep = usize::from(!current.is_empty());

        if current_len + sep + line_len <= limit {
            if sep == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += sep + line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            let mut pieces = chars.chunks(limit).map(|c| c.iter().collect::<String>());
            let mut last = pieces.next().unwrap_or_default();
            for piece in pieces {
                chunks.push(std::mem::replace(&mut last, piece));
            }
            current_len = last.chars().count();
            current = last;
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

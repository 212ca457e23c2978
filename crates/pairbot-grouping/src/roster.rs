// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Roster selection from guild members.

use pairbot_core::GuildMember;
use tracing::debug;

/// Returns the ids of members eligible for grouping or fines, in guild order.
///
/// Bots are always excluded. With `required_role`, only members holding that
/// role are kept.
pub fn eligible_roster(members: &[GuildMember], required_role: Option<u64>) -> Vec<String> {
    let roster: Vec<String> = members
        .iter()
        .filter(|m| !m.is_bot)
        .filter(|m| required_role.is_none_or(|role| m.has_role(role)))
        .map(|m| m.id.clone())
        .collect();
    debug!(
        total = members.len(),
        eligible = roster.len(),
        role_filter = ?required_role,
        "selected roster"
    );
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, is_bot: bool, roles: &[u64]) -> GuildMember {
        GuildMember {
            id: id.into(),
            name: format!("user-{id}"),
            is_bot,
            roles: roles.to_vec(),
        }
    }

    #[test]
    fn bots_are_never_eligible() {
        let members = vec![member("1", false, &[]), member("2", true, &[]), member("3", false, &[])];
        assert_eq!(eligible_roster(&members, None), vec!["1", "3"]);
    }

    #[test]
    fn role_filter_keeps_only_holders() {
        let members = vec![
            member("1", false, &[7]),
            member("2", false, &[8]),
            member("3", true, &[7]),
            member("4", false, &[8, 7]),
        ];
        assert_eq!(eligible_roster(&members, Some(7)), vec!["1", "4"]);
    }

    #[test]
    fn empty_guild_gives_empty_roster() {
        assert!(eligible_roster(&[], Some(1)).is_empty());
    }
}

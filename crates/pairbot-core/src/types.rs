// SPDX-FileCopyrightText: 2026 Pairbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across collaborator traits and bot operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A chat channel the bot can post into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A guild member as seen by the core logic.
///
/// `id` is the opaque member identifier persisted in every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub id: String,
    pub name: String,
    pub is_bot: bool,
    pub roles: Vec<u64>,
}

impl GuildMember {
    /// Whether the member holds the given role.
    pub fn has_role(&self, role: u64) -> bool {
        self.roles.contains(&role)
    }
}

/// How the partitioner sizes groups.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupingPolicy {
    /// Groups of 2 or 3, never leaving a lone member behind.
    #[default]
    Groups,
    /// Strict pairs; a lone leftover joins the last pair.
    Pairs,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Chat,
    Storage,
}

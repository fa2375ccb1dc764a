//! Tracked-account types: the durable per-account lifecycle ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a tracked account.
///
/// Ordered lifecycle `invited → registered → authorized → completed`, with an
/// orthogonal terminal `failed` reachable from any state. `team_owner` is
/// reserved for legacy-format team administrators, which go through an OTP
/// login path instead of token reuse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Seat invited, registration not yet attempted.
    Invited,
    /// Registration done, authorization pending.
    Registered,
    /// Authorized upstream but not yet confirmed in the pool.
    Authorized,
    /// Fully provisioned; never reprocessed.
    Completed,
    /// Terminal failure.
    Failed,
    /// Legacy-format team administrator awaiting the OTP login path.
    TeamOwner,
}

impl AccountStatus {
    /// Whether the pipeline is done with this account.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invited => "invited",
            Self::Registered => "registered",
            Self::Authorized => "authorized",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TeamOwner => "team_owner",
        };
        write!(f, "{s}")
    }
}

/// Account role within a team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Team administrator.
    Owner,
    /// Regular seat.
    #[default]
    Member,
}

/// One row of the tracker: a (team, email) pair's lifecycle state.
///
/// Uniqueness invariant: at most one entry per (team, email); all mutations
/// funnel through the tracker's upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedAccount {
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub status: AccountStatus,
    #[serde(default)]
    pub role: AccountRole,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

//! Freeze token and per-user counter types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a freeze token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FreezeStatus {
    Available,
    Used,
    Expired,
}

impl FreezeStatus {
    /// Stable storage form of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "used" => Some(Self::Used),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// A consumable grant that retroactively marks one day as successful for
/// streak purposes.
///
/// Tokens are created `Available` by the weekly grant and transition to
/// `Used` exactly once via activation; the coverage fields are stamped at
/// that point and never reverted. Expiry is driven by a process outside
/// this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeToken {
    pub id: String,
    pub user_id: String,
    pub status: FreezeStatus,
    pub granted_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// `None` covers "any habit"; `Some` pins coverage to one habit.
    pub covered_habit_id: Option<String>,
    pub covered_local_day: Option<NaiveDate>,
}

/// Per-user summary counters, one row per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCounters {
    pub user_id: String,
    pub freeze_tokens_available: i64,
    pub last_freeze_grant_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

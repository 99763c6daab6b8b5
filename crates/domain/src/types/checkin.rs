//! Check-in and skip record types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a check-in originated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckinSource {
    #[default]
    Manual,
    Timer,
}

impl CheckinSource {
    /// Stable storage form of this source.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Timer => "timer",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "timer" => Some(Self::Timer),
            _ => None,
        }
    }
}

/// A single check-in or skip event for a habit.
///
/// `local_day` is derived once at creation from the instant, the user's
/// timezone, and the habit's day-boundary offset, and never rewritten.
/// A skip record carries no quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinRecord {
    pub id: String,
    pub habit_id: String,
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
    pub local_day: NaiveDate,
    pub quantity: Option<f64>,
    pub source: CheckinSource,
    pub note: Option<String>,
    pub is_skip: bool,
    pub created_at: DateTime<Utc>,
}

impl CheckinRecord {
    /// True for records that count toward completion (not skips).
    pub fn is_completion(&self) -> bool {
        !self.is_skip
    }
}

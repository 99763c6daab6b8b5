//! User profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First day of the week for period calculations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Mon,
    Sun,
}

impl WeekStart {
    /// Stable storage form of this week start.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Sun => "sun",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mon" => Some(Self::Mon),
            "sun" => Some(Self::Sun),
            _ => None,
        }
    }
}

/// User profile as the engine sees it.
///
/// Identity provisioning lives outside the engine; the profile carries the
/// fields local-day resolution and period math depend on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    /// IANA timezone identifier, e.g. "Europe/Berlin".
    pub timezone: String,
    pub week_start: WeekStart,
    pub preferences: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub last_active_at: Option<DateTime<Utc>>,
}

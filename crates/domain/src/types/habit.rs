//! Habit configuration types

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// How completion of a habit is measured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    /// Done or not done; one completion per local day.
    Binary,
    /// Accumulated count toward a target (e.g. glasses of water).
    Count,
    /// Accumulated minutes toward a target.
    Duration,
    /// Timer-sourced accumulated minutes.
    Timer,
}

impl TrackType {
    /// Stable storage form of this track type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Count => "count",
            Self::Duration => "duration",
            Self::Timer => "timer",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "binary" => Some(Self::Binary),
            "count" => Some(Self::Count),
            "duration" => Some(Self::Duration),
            "timer" => Some(Self::Timer),
            _ => None,
        }
    }
}

/// Cadence on which a habit is due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl ScheduleType {
    /// Stable storage form of this schedule type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Period a count target applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerPeriod {
    Day,
    Week,
    Month,
}

impl PerPeriod {
    /// Stable storage form of this period.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// How skip records are treated for this habit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    #[default]
    None,
    AllowSkips,
    Vacation,
}

impl SkipPolicy {
    /// Stable storage form of this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AllowSkips => "allow_skips",
            Self::Vacation => "vacation",
        }
    }

    /// Parse the storage form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "allow_skips" => Some(Self::AllowSkips),
            "vacation" => Some(Self::Vacation),
            _ => None,
        }
    }
}

/// Weekday code as stored on a habit's allowed-days list.
///
/// Wire form is the three-letter lowercase code ("mon".."sun").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    /// Three-letter lowercase code for this weekday.
    pub fn code(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    /// Parse a three-letter lowercase code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mon" => Some(Self::Mon),
            "tue" => Some(Self::Tue),
            "wed" => Some(Self::Wed),
            "thu" => Some(Self::Thu),
            "fri" => Some(Self::Fri),
            "sat" => Some(Self::Sat),
            "sun" => Some(Self::Sun),
            _ => None,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }
}

/// A recurring habit and its tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub track_type: TrackType,
    pub schedule_type: ScheduleType,
    /// Required and positive for weekly/monthly schedules.
    pub count_target: Option<i64>,
    pub per_period: Option<PerPeriod>,
    /// Empty means the habit is due every day.
    pub allowed_days: Vec<DayOfWeek>,
    /// Minutes the local day boundary is shifted from midnight, in [-720, 720].
    pub day_boundary_offset_minutes: i32,
    pub skip_policy: SkipPolicy,
    pub freeze_enabled: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub track_type: TrackType,
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub count_target: Option<i64>,
    #[serde(default)]
    pub per_period: Option<PerPeriod>,
    #[serde(default)]
    pub allowed_days: Vec<DayOfWeek>,
    #[serde(default)]
    pub day_boundary_offset_minutes: Option<i32>,
    #[serde(default)]
    pub skip_policy: Option<SkipPolicy>,
    #[serde(default)]
    pub freeze_enabled: Option<bool>,
}

/// Partial update for a habit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub count_target: Option<i64>,
    #[serde(default)]
    pub per_period: Option<PerPeriod>,
    #[serde(default)]
    pub allowed_days: Option<Vec<DayOfWeek>>,
    #[serde(default)]
    pub day_boundary_offset_minutes: Option<i32>,
    #[serde(default)]
    pub skip_policy: Option<SkipPolicy>,
    #[serde(default)]
    pub freeze_enabled: Option<bool>,
    #[serde(default)]
    pub is_archived: Option<bool>,
}

impl HabitPatch {
    /// True when the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.icon.is_none()
            && self.color.is_none()
            && self.category.is_none()
            && self.count_target.is_none()
            && self.per_period.is_none()
            && self.allowed_days.is_none()
            && self.day_boundary_offset_minutes.is_none()
            && self.skip_policy.is_none()
            && self.freeze_enabled.is_none()
            && self.is_archived.is_none()
    }
}

//! Derived streak and analytics snapshot types
//!
//! Both types are entirely recomputable from the underlying records and
//! freeze tokens. They are overwritten in place on every recomputation,
//! never appended.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current/longest streak snapshot, one row per habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub habit_id: String,
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_success_local_day: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl StreakSnapshot {
    /// Fresh zeroed snapshot, created alongside a new habit.
    pub fn zeroed(habit_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            habit_id: habit_id.into(),
            user_id: user_id.into(),
            current_streak: 0,
            longest_streak: 0,
            last_success_local_day: None,
            updated_at: Utc::now(),
        }
    }
}

/// One day's recomputed completion rate and strength score for a habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAnalytics {
    pub habit_id: String,
    pub user_id: String,
    pub date: NaiveDate,
    /// Aggregated completion quantity for the day.
    pub completions: f64,
    pub target: f64,
    /// Fraction of the target met, clamped to [0, 1].
    pub completion_rate: f64,
    /// EWMA of the daily completion rate, on a 0-100 scale.
    pub strength_score: f64,
    pub updated_at: DateTime<Utc>,
}

//! Daily analytics scoring service - core business logic

use std::sync::Arc;

use cadence_domain::constants::EWMA_ALPHA;
use cadence_domain::{DailyAnalytics, Habit, Result, UserProfile};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::ports::AnalyticsRepository;
use crate::aggregate::{aggregate_completions, target_for};
use crate::records::ports::CheckinRepository;

/// Daily analytics scoring service
///
/// Recomputes one day's completion rate and strength score. The strength
/// score is a forward-chaining recurrence: each day's score depends only on
/// the immediately preceding day's stored score, so backfilled history does
/// not correct later days unless those days are re-triggered.
pub struct AnalyticsService {
    records: Arc<dyn CheckinRepository>,
    analytics: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    /// Create a new analytics service
    pub fn new(
        records: Arc<dyn CheckinRepository>,
        analytics: Arc<dyn AnalyticsRepository>,
    ) -> Self {
        Self { records, analytics }
    }

    /// Recompute and upsert the analytics row for one local day.
    pub async fn score_day(
        &self,
        habit: &Habit,
        user: &UserProfile,
        local_day: NaiveDate,
    ) -> Result<DailyAnalytics> {
        let day_records =
            self.records.get_records_for_day(&habit.id, &user.id, local_day).await?;
        let completions = aggregate_completions(habit.track_type, &day_records);
        let target = target_for(habit.track_type, habit.count_target);
        let completion_rate = if target > 0.0 { (completions / target).min(1.0) } else { 0.0 };

        let previous_strength = match local_day.pred_opt() {
            Some(previous_day) => self
                .analytics
                .get_day(&habit.id, previous_day)
                .await?
                .map_or(0.0, |row| row.strength_score),
            None => 0.0,
        };

        let today_score = completion_rate * 100.0;
        let strength_score = round2(EWMA_ALPHA * today_score + (1.0 - EWMA_ALPHA) * previous_strength);

        let row = DailyAnalytics {
            habit_id: habit.id.clone(),
            user_id: user.id.clone(),
            date: local_day,
            completions,
            target,
            completion_rate,
            strength_score,
            updated_at: Utc::now(),
        };
        self.analytics.upsert_day(row.clone()).await?;
        debug!(habit_id = %habit.id, %local_day, strength = strength_score, "daily analytics scored");

        Ok(row)
    }

    /// Analytics rows for a habit within an inclusive date range.
    pub async fn range(
        &self,
        habit: &Habit,
        user: &UserProfile,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAnalytics>> {
        self.analytics.get_range(&habit.id, &user.id, start, end).await
    }
}

/// Round to two decimal places, matching the stored score precision.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

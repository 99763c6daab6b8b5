//! Port interfaces for daily analytics rows

use async_trait::async_trait;
use cadence_domain::{DailyAnalytics, Result};
use chrono::NaiveDate;

/// Trait for persisting recomputed daily analytics
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Upsert the row for (habit, date)
    async fn upsert_day(&self, row: DailyAnalytics) -> Result<()>;

    /// Get the row for (habit, date), if one exists
    async fn get_day(&self, habit_id: &str, date: NaiveDate) -> Result<Option<DailyAnalytics>>;

    /// Rows for a habit within `[start, end]`, ascending by date
    async fn get_range(
        &self,
        habit_id: &str,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyAnalytics>>;
}

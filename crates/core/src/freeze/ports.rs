//! Port interfaces for freeze tokens and user counters

use async_trait::async_trait;
use cadence_domain::{FreezeToken, Result, UserCounters};
use chrono::{DateTime, NaiveDate, Utc};

/// Trait for persisting freeze tokens
#[async_trait]
pub trait FreezeTokenRepository: Send + Sync {
    /// Insert a batch of freshly granted tokens
    async fn insert_tokens(&self, tokens: Vec<FreezeToken>) -> Result<()>;

    /// Atomically transition the user's oldest available token to used,
    /// stamping the coverage fields.
    ///
    /// Returns `None` when no available token remains (e.g. lost race).
    async fn use_oldest_available(
        &self,
        user_id: &str,
        covered_habit_id: Option<&str>,
        covered_local_day: NaiveDate,
        used_at: DateTime<Utc>,
    ) -> Result<Option<FreezeToken>>;

    /// Used tokens covering the given habit with covered day in
    /// `[start, end]`
    async fn get_used_covering(
        &self,
        user_id: &str,
        habit_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FreezeToken>>;
}

/// Trait for the per-user counters row
#[async_trait]
pub trait UserCountersRepository: Send + Sync {
    /// Get the counters row for a user, if one exists
    async fn get(&self, user_id: &str) -> Result<Option<UserCounters>>;

    /// Insert or replace the counters row
    async fn upsert(&self, counters: UserCounters) -> Result<()>;
}

//! Port interfaces for check-in and skip records
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use cadence_domain::{CheckinRecord, Result};
use chrono::NaiveDate;

/// Trait for persisting and querying check-in/skip records
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    /// Insert a completion record
    async fn insert_checkin(&self, record: CheckinRecord) -> Result<()>;

    /// Insert a skip record under the (habit, local day) skip uniqueness
    /// guarantee.
    ///
    /// Returns `false` when a concurrent insert already holds the slot, so
    /// the caller can re-fetch the winning row instead of failing.
    async fn insert_skip(&self, record: CheckinRecord) -> Result<bool>;

    /// Find the non-skip record for a binary habit's local day, if any
    async fn find_completion(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> Result<Option<CheckinRecord>>;

    /// Find the skip record for a local day, if any
    async fn find_skip(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> Result<Option<CheckinRecord>>;

    /// All records for one local day
    async fn get_records_for_day(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> Result<Vec<CheckinRecord>>;

    /// All records with local day within `[start, end]`, ascending by
    /// (local day, occurred-at)
    async fn get_records_in_range(
        &self,
        habit_id: &str,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CheckinRecord>>;

    /// Listing for consumers: newest first, optionally bounded to an
    /// inclusive local-day range
    async fn list_records(
        &self,
        habit_id: &str,
        user_id: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<CheckinRecord>>;
}

//! Record ledger service - core business logic

use std::sync::Arc;

use cadence_domain::{
    CadenceError, CheckinRecord, CheckinSource, Habit, Result, TrackType, UserProfile,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

use super::ports::CheckinRepository;
use crate::dates::{parse_timezone, resolve_local_day};
use crate::recompute::RecomputeService;

/// Input for creating a check-in.
#[derive(Debug, Clone, Default)]
pub struct CheckinInput {
    /// Defaults to now when the caller does not supply an instant.
    pub occurred_at: Option<DateTime<Utc>>,
    pub quantity: Option<f64>,
    pub note: Option<String>,
    pub source: Option<CheckinSource>,
}

/// Record ledger service
///
/// Owns creation of check-in and skip records with idempotency and
/// race-safety guarantees, and triggers recomputation synchronously so the
/// caller observes consistent derived state.
pub struct RecordService {
    records: Arc<dyn CheckinRepository>,
    recompute: Arc<RecomputeService>,
}

impl RecordService {
    /// Create a new record service
    pub fn new(records: Arc<dyn CheckinRepository>, recompute: Arc<RecomputeService>) -> Self {
        Self { records, recompute }
    }

    /// Record a check-in for a habit.
    ///
    /// For binary habits a second check-in on the same local day is absorbed:
    /// the existing record is returned unchanged instead of raising an error.
    pub async fn create_checkin(
        &self,
        user: &UserProfile,
        habit: &Habit,
        input: CheckinInput,
    ) -> Result<CheckinRecord> {
        let tz = parse_timezone(&user.timezone)?;
        let occurred_at = input.occurred_at.unwrap_or_else(Utc::now);
        let local_day = resolve_local_day(occurred_at, tz, habit.day_boundary_offset_minutes);

        if habit.track_type == TrackType::Binary {
            if let Some(existing) =
                self.records.find_completion(&habit.id, &user.id, local_day).await?
            {
                // Idempotent: duplicate submissions return the stored completion
                return Ok(existing);
            }
        }

        let record = CheckinRecord {
            id: Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            user_id: user.id.clone(),
            occurred_at,
            local_day,
            quantity: input.quantity,
            source: input.source.unwrap_or_default(),
            note: input.note,
            is_skip: false,
            created_at: Utc::now(),
        };
        self.records.insert_checkin(record.clone()).await?;
        debug!(habit_id = %habit.id, %local_day, "check-in recorded");

        self.recompute.recompute(habit, user, local_day).await?;

        Ok(record)
    }

    /// Record a skip for a habit's local day.
    ///
    /// At most one skip exists per (habit, local day). A duplicate submission
    /// returns the stored skip; when a concurrent submission wins the insert
    /// race the winning row is returned (first writer wins).
    pub async fn create_skip(
        &self,
        user: &UserProfile,
        habit: &Habit,
        local_day: NaiveDate,
        note: Option<String>,
    ) -> Result<CheckinRecord> {
        if let Some(existing) = self.records.find_skip(&habit.id, &user.id, local_day).await? {
            return Ok(existing);
        }

        let record = CheckinRecord {
            id: Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            user_id: user.id.clone(),
            occurred_at: Utc::now(),
            local_day,
            quantity: None,
            source: CheckinSource::Manual,
            note,
            is_skip: true,
            created_at: Utc::now(),
        };

        if !self.records.insert_skip(record.clone()).await? {
            // A concurrent request inserted first; hand back the winning row
            return self.records.find_skip(&habit.id, &user.id, local_day).await?.ok_or_else(
                || CadenceError::Internal("skip insert conflicted but no row found".into()),
            );
        }
        debug!(habit_id = %habit.id, %local_day, "skip recorded");

        self.recompute.recompute(habit, user, local_day).await?;

        Ok(record)
    }

    /// List a habit's records, newest first, optionally bounded to an
    /// inclusive local-day range.
    pub async fn list_checkins(
        &self,
        habit: &Habit,
        user: &UserProfile,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<CheckinRecord>> {
        self.records.list_records(&habit.id, &user.id, range).await
    }
}

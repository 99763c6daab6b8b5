//! Freeze ledger service - core business logic

use std::sync::Arc;

use cadence_domain::constants::{FREEZE_COVERAGE_WEEKS, FREEZE_TOKEN_CAP};
use cadence_domain::{
    CadenceError, FreezeStatus, FreezeToken, Result, UserCounters,
};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use super::ports::{FreezeTokenRepository, UserCountersRepository};
use crate::dates::day_start_utc;
use crate::habits::ports::HabitRepository;

/// Freeze ledger service
pub struct FreezeService {
    tokens: Arc<dyn FreezeTokenRepository>,
    counters: Arc<dyn UserCountersRepository>,
    habits: Arc<dyn HabitRepository>,
}

impl FreezeService {
    /// Create a new freeze service
    pub fn new(
        tokens: Arc<dyn FreezeTokenRepository>,
        counters: Arc<dyn UserCountersRepository>,
        habits: Arc<dyn HabitRepository>,
    ) -> Self {
        Self { tokens, counters, habits }
    }

    /// Get the user's counters row, creating the singleton on first use.
    pub async fn ensure_counters(&self, user_id: &str) -> Result<UserCounters> {
        if let Some(counters) = self.counters.get(user_id).await? {
            return Ok(counters);
        }

        let fresh = UserCounters {
            user_id: user_id.to_string(),
            freeze_tokens_available: 0,
            last_freeze_grant_at: None,
            updated_at: Utc::now(),
        };
        self.counters.upsert(fresh.clone()).await?;
        Ok(fresh)
    }

    /// Grant weekly freeze tokens if the user is due any.
    ///
    /// Lazy and idempotent on call frequency: calls within the same week
    /// grant nothing extra; a call after a long absence grants one token per
    /// elapsed whole week, capped.
    pub async fn grant_if_eligible(&self, user_id: &str) -> Result<UserCounters> {
        let counters = self.ensure_counters(user_id).await?;

        if counters.freeze_tokens_available >= FREEZE_TOKEN_CAP {
            return Ok(counters);
        }

        let now = Utc::now();
        let weeks_to_grant = match counters.last_freeze_grant_at {
            // First-time bootstrap
            None => 1,
            Some(last_grant) => {
                let weeks_elapsed = (now - last_grant).num_weeks();
                if weeks_elapsed < 1 {
                    return Ok(counters);
                }
                weeks_elapsed
            }
        };

        self.grant_tokens(counters, weeks_to_grant, now).await
    }

    /// Consume one available token to retroactively cover a missed day.
    ///
    /// The covered day must fall within the last `FREEZE_COVERAGE_WEEKS`
    /// whole weeks. Streak recomputation is the caller's responsibility.
    pub async fn activate(
        &self,
        user_id: &str,
        habit_id: Option<&str>,
        covered_local_day: NaiveDate,
    ) -> Result<FreezeToken> {
        let counters = self.ensure_counters(user_id).await?;

        if counters.freeze_tokens_available <= 0 {
            return Err(CadenceError::Ineligible("no freeze tokens available".into()));
        }

        if let Some(habit_id) = habit_id {
            if self.habits.find_habit(habit_id, user_id).await?.is_none() {
                return Err(CadenceError::NotFound("habit not found".into()));
            }
        }

        let now = Utc::now();
        let weeks_back = (now - day_start_utc(covered_local_day)).num_weeks();
        if weeks_back >= FREEZE_COVERAGE_WEEKS {
            return Err(CadenceError::Ineligible(format!(
                "freeze tokens can only cover the last {FREEZE_COVERAGE_WEEKS} weeks"
            )));
        }

        let token = self
            .tokens
            .use_oldest_available(user_id, habit_id, covered_local_day, now)
            .await?
            .ok_or_else(|| CadenceError::Ineligible("no freeze tokens available".into()))?;

        let updated = UserCounters {
            freeze_tokens_available: counters.freeze_tokens_available - 1,
            updated_at: now,
            ..counters
        };
        self.counters.upsert(updated).await?;
        info!(user_id, covered_day = %covered_local_day, "freeze token activated");

        Ok(token)
    }

    async fn grant_tokens(
        &self,
        baseline: UserCounters,
        weeks_to_grant: i64,
        now: DateTime<Utc>,
    ) -> Result<UserCounters> {
        let available = (baseline.freeze_tokens_available + weeks_to_grant).min(FREEZE_TOKEN_CAP);
        let granted = available - baseline.freeze_tokens_available;

        let updated = UserCounters {
            freeze_tokens_available: available,
            last_freeze_grant_at: Some(now),
            updated_at: now,
            ..baseline
        };
        self.counters.upsert(updated.clone()).await?;

        if granted > 0 {
            let tokens = (0..granted)
                .map(|_| FreezeToken {
                    id: Uuid::new_v4().to_string(),
                    user_id: updated.user_id.clone(),
                    status: FreezeStatus::Available,
                    granted_at: now,
                    used_at: None,
                    expires_at: None,
                    covered_habit_id: None,
                    covered_local_day: None,
                })
                .collect();
            self.tokens.insert_tokens(tokens).await?;
            info!(user_id = %updated.user_id, granted, "freeze tokens granted");
        }

        Ok(updated)
    }
}

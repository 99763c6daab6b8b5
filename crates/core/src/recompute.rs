//! Recomputation orchestrator
//!
//! Every mutating event (check-in, skip, freeze activation) funnels through
//! here: the daily analytics pass and the streak pass run as two concurrent
//! tasks over the same historical window and are joined before the caller
//! proceeds. Runs for the same habit are serialized so an older in-flight
//! recomputation cannot overwrite a newer one.

use std::sync::Arc;

use cadence_domain::{DailyAnalytics, Habit, Result, StreakSnapshot, UserProfile};
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::analytics::AnalyticsService;
use crate::streaks::StreakService;

/// Derived state produced by one recomputation.
#[derive(Debug, Clone)]
pub struct RecomputeOutcome {
    pub analytics: DailyAnalytics,
    pub streak: StreakSnapshot,
}

/// Recomputation orchestrator
pub struct RecomputeService {
    streaks: Arc<StreakService>,
    analytics: Arc<AnalyticsService>,
    habit_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RecomputeService {
    /// Create a new orchestrator
    pub fn new(streaks: Arc<StreakService>, analytics: Arc<AnalyticsService>) -> Self {
        Self { streaks, analytics, habit_locks: DashMap::new() }
    }

    /// Recompute derived state for (habit, user, local day).
    ///
    /// Both passes are deterministic and idempotent given the same records,
    /// so retrying after a failure is safe for the caller.
    pub async fn recompute(
        &self,
        habit: &Habit,
        user: &UserProfile,
        local_day: NaiveDate,
    ) -> Result<RecomputeOutcome> {
        let lock = {
            let entry = self.habit_locks.entry(habit.id.clone()).or_default();
            Arc::clone(&entry)
        };
        let _guard = lock.lock().await;

        debug!(habit_id = %habit.id, %local_day, "recomputing derived state");
        let (analytics, streak) = tokio::try_join!(
            self.analytics.score_day(habit, user, local_day),
            self.streaks.recompute(habit, user, local_day),
        )?;

        Ok(RecomputeOutcome { analytics, streak })
    }
}

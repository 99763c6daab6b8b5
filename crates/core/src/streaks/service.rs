//! Streak recomputation service - core business logic

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use cadence_domain::constants::STREAK_LOOKBACK_DAYS;
use cadence_domain::{CheckinRecord, Habit, Result, StreakSnapshot, UserProfile};
use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use super::ports::StreakRepository;
use crate::aggregate::{aggregate_completions, target_for};
use crate::dates::parse_timezone;
use crate::freeze::ports::FreezeTokenRepository;
use crate::records::ports::CheckinRepository;
use crate::schedule::expected_days;

/// Streak recomputation service
///
/// Recomputes current/longest streaks from records, freeze coverage, and
/// the habit's expected-day sequence over a fixed lookback window.
pub struct StreakService {
    records: Arc<dyn CheckinRepository>,
    freezes: Arc<dyn FreezeTokenRepository>,
    streaks: Arc<dyn StreakRepository>,
}

impl StreakService {
    /// Create a new streak service
    pub fn new(
        records: Arc<dyn CheckinRepository>,
        freezes: Arc<dyn FreezeTokenRepository>,
        streaks: Arc<dyn StreakRepository>,
    ) -> Self {
        Self { records, freezes, streaks }
    }

    /// Recompute and upsert a habit's streak snapshot.
    ///
    /// Success per expected day is evaluated with first-match-wins
    /// precedence: a skip record, then completions meeting the target, then
    /// freeze coverage; anything else is a failure.
    pub async fn recompute(
        &self,
        habit: &Habit,
        user: &UserProfile,
        reference_day: NaiveDate,
    ) -> Result<StreakSnapshot> {
        let tz = parse_timezone(&user.timezone)?;
        let window_start = reference_day - Duration::days(STREAK_LOOKBACK_DAYS);

        let records = self
            .records
            .get_records_in_range(&habit.id, &user.id, window_start, reference_day)
            .await?;
        let tokens = self
            .freezes
            .get_used_covering(&user.id, &habit.id, window_start, reference_day)
            .await?;

        let mut by_day: BTreeMap<NaiveDate, Vec<CheckinRecord>> = BTreeMap::new();
        for record in records {
            by_day.entry(record.local_day).or_default().push(record);
        }
        let frozen: BTreeSet<NaiveDate> =
            tokens.into_iter().filter_map(|token| token.covered_local_day).collect();

        let expected = expected_days(
            habit.schedule_type,
            &habit.allowed_days,
            tz,
            habit.day_boundary_offset_minutes,
            window_start,
            reference_day,
        );
        let target = target_for(habit.track_type, habit.count_target);

        let met = |day: &NaiveDate| -> bool {
            let day_records = by_day.get(day);
            if day_records.is_some_and(|records| records.iter().any(|r| r.is_skip)) {
                return true;
            }
            let completions =
                day_records.map_or(0.0, |records| aggregate_completions(habit.track_type, records));
            if completions >= target {
                return true;
            }
            frozen.contains(day)
        };

        let (current_streak, longest_streak) = scan_streaks(&expected, met);

        let snapshot = StreakSnapshot {
            habit_id: habit.id.clone(),
            user_id: user.id.clone(),
            current_streak,
            longest_streak,
            last_success_local_day: if current_streak > 0 { expected.last().copied() } else { None },
            updated_at: Utc::now(),
        };
        self.streaks.upsert_snapshot(snapshot.clone()).await?;
        debug!(
            habit_id = %habit.id,
            current = current_streak,
            longest = longest_streak,
            "streak snapshot recomputed"
        );

        Ok(snapshot)
    }
}

/// Scan an expected-day sequence for (current, longest) streaks.
///
/// Longest is the maximum success run over the whole sequence; current is
/// the unbroken run counting backward from the last expected day.
fn scan_streaks(expected: &[NaiveDate], met: impl Fn(&NaiveDate) -> bool) -> (u32, u32) {
    let mut longest = 0u32;
    let mut chain = 0u32;
    for day in expected {
        if met(day) {
            chain += 1;
            longest = longest.max(chain);
        } else {
            chain = 0;
        }
    }

    let mut current = 0u32;
    for day in expected.iter().rev() {
        if met(day) {
            current += 1;
        } else {
            break;
        }
    }

    (current, longest)
}

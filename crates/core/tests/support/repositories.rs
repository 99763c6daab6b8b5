//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic unit tests without database dependencies.

use std::collections::HashMap;

use async_trait::async_trait;
use cadence_core::{
    AnalyticsRepository, CheckinRepository, FreezeTokenRepository, HabitRepository,
    StreakRepository, UserCountersRepository, UserProfileRepository,
};
use cadence_domain::{
    CheckinRecord, DailyAnalytics, FreezeStatus, FreezeToken, Habit, Result as DomainResult,
    StreakSnapshot, UserCounters, UserProfile,
};
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

/// In-memory mock for `CheckinRepository`.
///
/// Enforces the skip uniqueness guarantee and can stage a deterministic
/// "concurrent writer" that lands between a service's duplicate check and
/// its insert, to exercise the conflict path.
#[derive(Default)]
pub struct InMemoryCheckinRepository {
    rows: Mutex<Vec<CheckinRecord>>,
    staged_skip_race: Mutex<Option<CheckinRecord>>,
}

impl InMemoryCheckinRepository {
    /// Seed a record directly, bypassing service semantics.
    pub fn seed(&self, record: CheckinRecord) {
        self.rows.lock().push(record);
    }

    /// Stage a competing skip that will win the insert race.
    pub fn stage_skip_race(&self, competitor: CheckinRecord) {
        *self.staged_skip_race.lock() = Some(competitor);
    }

    /// All stored rows, for assertions.
    pub fn all(&self) -> Vec<CheckinRecord> {
        self.rows.lock().clone()
    }

    /// Number of stored skip rows for one (habit, day).
    pub fn skip_count(&self, habit_id: &str, local_day: NaiveDate) -> usize {
        self.rows
            .lock()
            .iter()
            .filter(|r| r.habit_id == habit_id && r.local_day == local_day && r.is_skip)
            .count()
    }
}

#[async_trait]
impl CheckinRepository for InMemoryCheckinRepository {
    async fn insert_checkin(&self, record: CheckinRecord) -> DomainResult<()> {
        self.rows.lock().push(record);
        Ok(())
    }

    async fn insert_skip(&self, record: CheckinRecord) -> DomainResult<bool> {
        // A staged competitor arrives "concurrently", before this insert
        if let Some(competitor) = self.staged_skip_race.lock().take() {
            self.rows.lock().push(competitor);
        }

        let mut rows = self.rows.lock();
        let occupied = rows.iter().any(|r| {
            r.habit_id == record.habit_id && r.local_day == record.local_day && r.is_skip
        });
        if occupied {
            return Ok(false);
        }
        rows.push(record);
        Ok(true)
    }

    async fn find_completion(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> DomainResult<Option<CheckinRecord>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|r| {
                r.habit_id == habit_id
                    && r.user_id == user_id
                    && r.local_day == local_day
                    && !r.is_skip
            })
            .cloned())
    }

    async fn find_skip(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> DomainResult<Option<CheckinRecord>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|r| {
                r.habit_id == habit_id
                    && r.user_id == user_id
                    && r.local_day == local_day
                    && r.is_skip
            })
            .cloned())
    }

    async fn get_records_for_day(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> DomainResult<Vec<CheckinRecord>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|r| r.habit_id == habit_id && r.user_id == user_id && r.local_day == local_day)
            .cloned()
            .collect())
    }

    async fn get_records_in_range(
        &self,
        habit_id: &str,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<CheckinRecord>> {
        let mut records: Vec<CheckinRecord> = self
            .rows
            .lock()
            .iter()
            .filter(|r| {
                r.habit_id == habit_id
                    && r.user_id == user_id
                    && r.local_day >= start
                    && r.local_day <= end
            })
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.local_day, r.occurred_at));
        Ok(records)
    }

    async fn list_records(
        &self,
        habit_id: &str,
        user_id: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> DomainResult<Vec<CheckinRecord>> {
        let mut records: Vec<CheckinRecord> = self
            .rows
            .lock()
            .iter()
            .filter(|r| {
                r.habit_id == habit_id
                    && r.user_id == user_id
                    && range.map_or(true, |(start, end)| {
                        r.local_day >= start && r.local_day <= end
                    })
            })
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.local_day, r.occurred_at));
        records.reverse();
        Ok(records)
    }
}

/// In-memory mock for `StreakRepository`.
#[derive(Default)]
pub struct InMemoryStreakRepository {
    rows: Mutex<HashMap<String, StreakSnapshot>>,
}

impl InMemoryStreakRepository {
    /// Stored snapshot for a habit, for assertions.
    pub fn snapshot(&self, habit_id: &str) -> Option<StreakSnapshot> {
        self.rows.lock().get(habit_id).cloned()
    }
}

#[async_trait]
impl StreakRepository for InMemoryStreakRepository {
    async fn upsert_snapshot(&self, snapshot: StreakSnapshot) -> DomainResult<()> {
        self.rows.lock().insert(snapshot.habit_id.clone(), snapshot);
        Ok(())
    }

    async fn get_snapshot(&self, habit_id: &str) -> DomainResult<Option<StreakSnapshot>> {
        Ok(self.rows.lock().get(habit_id).cloned())
    }
}

/// In-memory mock for `AnalyticsRepository`.
#[derive(Default)]
pub struct InMemoryAnalyticsRepository {
    rows: Mutex<HashMap<(String, NaiveDate), DailyAnalytics>>,
}

impl InMemoryAnalyticsRepository {
    /// Stored row for (habit, date), for assertions.
    pub fn row(&self, habit_id: &str, date: NaiveDate) -> Option<DailyAnalytics> {
        self.rows.lock().get(&(habit_id.to_string(), date)).cloned()
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalyticsRepository {
    async fn upsert_day(&self, row: DailyAnalytics) -> DomainResult<()> {
        self.rows.lock().insert((row.habit_id.clone(), row.date), row);
        Ok(())
    }

    async fn get_day(
        &self,
        habit_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Option<DailyAnalytics>> {
        Ok(self.rows.lock().get(&(habit_id.to_string(), date)).cloned())
    }

    async fn get_range(
        &self,
        habit_id: &str,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<DailyAnalytics>> {
        let mut rows: Vec<DailyAnalytics> = self
            .rows
            .lock()
            .values()
            .filter(|row| {
                row.habit_id == habit_id
                    && row.user_id == user_id
                    && row.date >= start
                    && row.date <= end
            })
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.date);
        Ok(rows)
    }
}

/// In-memory mock for `FreezeTokenRepository`.
#[derive(Default)]
pub struct InMemoryFreezeTokenRepository {
    rows: Mutex<Vec<FreezeToken>>,
}

impl InMemoryFreezeTokenRepository {
    /// Seed a token directly, bypassing the grant path.
    pub fn seed(&self, token: FreezeToken) {
        self.rows.lock().push(token);
    }

    /// All stored tokens, for assertions.
    pub fn all(&self) -> Vec<FreezeToken> {
        self.rows.lock().clone()
    }

    /// Number of tokens in a given status for a user.
    pub fn count_by_status(&self, user_id: &str, status: FreezeStatus) -> usize {
        self.rows
            .lock()
            .iter()
            .filter(|t| t.user_id == user_id && t.status == status)
            .count()
    }
}

#[async_trait]
impl FreezeTokenRepository for InMemoryFreezeTokenRepository {
    async fn insert_tokens(&self, tokens: Vec<FreezeToken>) -> DomainResult<()> {
        self.rows.lock().extend(tokens);
        Ok(())
    }

    async fn use_oldest_available(
        &self,
        user_id: &str,
        covered_habit_id: Option<&str>,
        covered_local_day: NaiveDate,
        used_at: DateTime<Utc>,
    ) -> DomainResult<Option<FreezeToken>> {
        let mut rows = self.rows.lock();
        let candidate = rows
            .iter_mut()
            .filter(|t| t.user_id == user_id && t.status == FreezeStatus::Available)
            .min_by_key(|t| t.granted_at);

        Ok(candidate.map(|token| {
            token.status = FreezeStatus::Used;
            token.covered_habit_id = covered_habit_id.map(ToString::to_string);
            token.covered_local_day = Some(covered_local_day);
            token.used_at = Some(used_at);
            token.clone()
        }))
    }

    async fn get_used_covering(
        &self,
        user_id: &str,
        habit_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<FreezeToken>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|t| {
                t.user_id == user_id
                    && t.status == FreezeStatus::Used
                    && t.covered_habit_id.as_deref() == Some(habit_id)
                    && t.covered_local_day.is_some_and(|day| day >= start && day <= end)
            })
            .cloned()
            .collect())
    }
}

/// In-memory mock for `UserCountersRepository`.
#[derive(Default)]
pub struct InMemoryUserCountersRepository {
    rows: Mutex<HashMap<String, UserCounters>>,
}

impl InMemoryUserCountersRepository {
    /// Seed a counters row directly.
    pub fn seed(&self, counters: UserCounters) {
        self.rows.lock().insert(counters.user_id.clone(), counters);
    }

    /// Stored counters for a user, for assertions.
    pub fn get_row(&self, user_id: &str) -> Option<UserCounters> {
        self.rows.lock().get(user_id).cloned()
    }
}

#[async_trait]
impl UserCountersRepository for InMemoryUserCountersRepository {
    async fn get(&self, user_id: &str) -> DomainResult<Option<UserCounters>> {
        Ok(self.rows.lock().get(user_id).cloned())
    }

    async fn upsert(&self, counters: UserCounters) -> DomainResult<()> {
        self.rows.lock().insert(counters.user_id.clone(), counters);
        Ok(())
    }
}

/// In-memory mock for `HabitRepository`.
#[derive(Default)]
pub struct InMemoryHabitRepository {
    rows: Mutex<HashMap<String, Habit>>,
}

impl InMemoryHabitRepository {
    /// Seed a habit directly, bypassing service validation.
    pub fn seed(&self, habit: Habit) {
        self.rows.lock().insert(habit.id.clone(), habit);
    }

    /// Stored habit by id, for assertions.
    pub fn get_row(&self, habit_id: &str) -> Option<Habit> {
        self.rows.lock().get(habit_id).cloned()
    }
}

#[async_trait]
impl HabitRepository for InMemoryHabitRepository {
    async fn insert_habit(&self, habit: Habit) -> DomainResult<()> {
        self.rows.lock().insert(habit.id.clone(), habit);
        Ok(())
    }

    async fn find_habit(&self, habit_id: &str, user_id: &str) -> DomainResult<Option<Habit>> {
        Ok(self
            .rows
            .lock()
            .get(habit_id)
            .filter(|habit| habit.user_id == user_id)
            .cloned())
    }

    async fn list_habits(&self, user_id: &str) -> DomainResult<Vec<Habit>> {
        let mut habits: Vec<Habit> = self
            .rows
            .lock()
            .values()
            .filter(|habit| habit.user_id == user_id)
            .cloned()
            .collect();
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(habits)
    }

    async fn update_habit(&self, habit: Habit) -> DomainResult<()> {
        self.rows.lock().insert(habit.id.clone(), habit);
        Ok(())
    }

    async fn delete_habit(&self, habit_id: &str, user_id: &str) -> DomainResult<()> {
        let mut rows = self.rows.lock();
        if rows.get(habit_id).is_some_and(|habit| habit.user_id == user_id) {
            rows.remove(habit_id);
        }
        Ok(())
    }
}

/// In-memory mock for `UserProfileRepository`.
#[derive(Default)]
pub struct InMemoryUserProfileRepository {
    rows: Mutex<HashMap<String, UserProfile>>,
}

impl InMemoryUserProfileRepository {
    /// Stored profile by id, for assertions.
    pub fn get_row(&self, user_id: &str) -> Option<UserProfile> {
        self.rows.lock().get(user_id).cloned()
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn find_profile(&self, user_id: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.rows.lock().get(user_id).cloned())
    }

    async fn insert_profile(&self, profile: UserProfile) -> DomainResult<()> {
        self.rows.lock().insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn update_profile(&self, profile: UserProfile) -> DomainResult<()> {
        self.rows.lock().insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn touch_last_active(&self, user_id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        if let Some(profile) = self.rows.lock().get_mut(user_id) {
            profile.last_active_at = Some(at);
        }
        Ok(())
    }
}

/// Build a record for tests that need to seed rows directly.
pub fn make_record(
    habit: &Habit,
    user_id: &str,
    local_day: NaiveDate,
    quantity: Option<f64>,
    is_skip: bool,
) -> CheckinRecord {
    CheckinRecord {
        id: uuid::Uuid::new_v4().to_string(),
        habit_id: habit.id.clone(),
        user_id: user_id.to_string(),
        occurred_at: Utc::now(),
        local_day,
        quantity,
        source: cadence_domain::CheckinSource::Manual,
        note: None,
        is_skip,
        created_at: Utc::now(),
    }
}

//! Shared test helpers for `cadence-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so the
//! engine tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod repositories;

use std::sync::Arc;

use cadence_core::{
    AnalyticsService, FreezeService, HabitService, RecomputeService, RecordService, StreakService,
    UserService,
};
use cadence_domain::{
    Habit, ScheduleType, SkipPolicy, TrackType, UserProfile, WeekStart,
};
use chrono::{NaiveDate, Utc};

use repositories::{
    InMemoryAnalyticsRepository, InMemoryCheckinRepository, InMemoryFreezeTokenRepository,
    InMemoryHabitRepository, InMemoryStreakRepository, InMemoryUserCountersRepository,
    InMemoryUserProfileRepository,
};

/// Fully wired engine over in-memory repositories.
///
/// The repository handles are exposed so tests can seed state and inspect
/// what the services persisted.
pub struct TestEngine {
    pub checkins: Arc<InMemoryCheckinRepository>,
    pub streak_rows: Arc<InMemoryStreakRepository>,
    pub analytics_rows: Arc<InMemoryAnalyticsRepository>,
    pub freeze_tokens: Arc<InMemoryFreezeTokenRepository>,
    pub counters: Arc<InMemoryUserCountersRepository>,
    pub habit_rows: Arc<InMemoryHabitRepository>,
    pub profiles: Arc<InMemoryUserProfileRepository>,
    pub records: RecordService,
    pub streaks: Arc<StreakService>,
    pub analytics: Arc<AnalyticsService>,
    pub freeze: FreezeService,
    pub habits: HabitService,
    pub users: UserService,
    pub recompute: Arc<RecomputeService>,
}

/// Wire the full service graph over fresh in-memory repositories.
pub fn engine() -> TestEngine {
    let checkins = Arc::new(InMemoryCheckinRepository::default());
    let streak_rows = Arc::new(InMemoryStreakRepository::default());
    let analytics_rows = Arc::new(InMemoryAnalyticsRepository::default());
    let freeze_tokens = Arc::new(InMemoryFreezeTokenRepository::default());
    let counters = Arc::new(InMemoryUserCountersRepository::default());
    let habit_rows = Arc::new(InMemoryHabitRepository::default());
    let profiles = Arc::new(InMemoryUserProfileRepository::default());

    let streaks = Arc::new(StreakService::new(
        checkins.clone(),
        freeze_tokens.clone(),
        streak_rows.clone(),
    ));
    let analytics = Arc::new(AnalyticsService::new(checkins.clone(), analytics_rows.clone()));
    let recompute = Arc::new(RecomputeService::new(streaks.clone(), analytics.clone()));
    let records = RecordService::new(checkins.clone(), recompute.clone());
    let freeze = FreezeService::new(freeze_tokens.clone(), counters.clone(), habit_rows.clone());
    let habits = HabitService::new(habit_rows.clone(), streak_rows.clone());
    let users = UserService::new(profiles.clone());

    TestEngine {
        checkins,
        streak_rows,
        analytics_rows,
        freeze_tokens,
        counters,
        habit_rows,
        profiles,
        records,
        streaks,
        analytics,
        freeze,
        habits,
        users,
        recompute,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A user living in UTC with default settings.
pub fn user_utc() -> UserProfile {
    UserProfile {
        id: "user-1".into(),
        email: Some("test@example.com".into()),
        timezone: "UTC".into(),
        week_start: WeekStart::Mon,
        preferences: serde_json::json!({}),
        created_at: Utc::now(),
        last_active_at: None,
    }
}

/// A daily binary habit with no allowed-days restriction.
pub fn daily_binary_habit(user: &UserProfile) -> Habit {
    habit_with(user, "habit-1", TrackType::Binary, ScheduleType::Daily, None)
}

/// A daily count habit with the given target.
pub fn count_habit(user: &UserProfile, target: i64) -> Habit {
    habit_with(user, "habit-count", TrackType::Count, ScheduleType::Daily, Some(target))
}

pub fn habit_with(
    user: &UserProfile,
    id: &str,
    track_type: TrackType,
    schedule_type: ScheduleType,
    count_target: Option<i64>,
) -> Habit {
    let now = Utc::now();
    Habit {
        id: id.into(),
        user_id: user.id.clone(),
        title: "Test habit".into(),
        description: None,
        icon: None,
        color: None,
        category: None,
        track_type,
        schedule_type,
        count_target,
        per_period: None,
        allowed_days: Vec::new(),
        day_boundary_offset_minutes: 0,
        skip_policy: SkipPolicy::None,
        freeze_enabled: true,
        is_archived: false,
        created_at: now,
        updated_at: now,
    }
}

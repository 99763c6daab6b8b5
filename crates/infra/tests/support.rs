//! Shared helpers for infra integration tests.
//!
//! Wires the full core service graph over the SQLite repositories so the
//! tests exercise the same object graph an embedding application would.

#![allow(dead_code)]

use std::sync::Arc;

use cadence_core::{
    AnalyticsService, FreezeService, HabitService, RecomputeService, RecordService, StreakService,
    UserService,
};
use cadence_infra::{
    DbManager, SqliteAnalyticsRepository, SqliteCheckinRepository, SqliteFreezeTokenRepository,
    SqliteHabitRepository, SqliteStreakRepository, SqliteUserCountersRepository,
    SqliteUserProfileRepository,
};
use tempfile::TempDir;

/// Full engine over a temp-file SQLite database.
pub struct TestServices {
    pub db: Arc<DbManager>,
    pub users: UserService,
    pub habits: HabitService,
    pub records: RecordService,
    pub freeze: FreezeService,
    pub recompute: Arc<RecomputeService>,
    pub streak_repo: Arc<SqliteStreakRepository>,
    pub analytics_repo: Arc<SqliteAnalyticsRepository>,
    pub counters_repo: Arc<SqliteUserCountersRepository>,
}

/// Build the service graph over a fresh migrated database.
pub fn services() -> (TestServices, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Arc::new(DbManager::new(db_path, 5).expect("create db manager"));
    db.run_migrations().expect("run migrations");

    let checkin_repo = Arc::new(SqliteCheckinRepository::new(db.clone()));
    let habit_repo = Arc::new(SqliteHabitRepository::new(db.clone()));
    let streak_repo = Arc::new(SqliteStreakRepository::new(db.clone()));
    let analytics_repo = Arc::new(SqliteAnalyticsRepository::new(db.clone()));
    let freeze_repo = Arc::new(SqliteFreezeTokenRepository::new(db.clone()));
    let counters_repo = Arc::new(SqliteUserCountersRepository::new(db.clone()));
    let profile_repo = Arc::new(SqliteUserProfileRepository::new(db.clone()));

    let streaks = Arc::new(StreakService::new(
        checkin_repo.clone(),
        freeze_repo.clone(),
        streak_repo.clone(),
    ));
    let analytics = Arc::new(AnalyticsService::new(checkin_repo.clone(), analytics_repo.clone()));
    let recompute = Arc::new(RecomputeService::new(streaks, analytics));
    let records = RecordService::new(checkin_repo, recompute.clone());
    let freeze = FreezeService::new(freeze_repo, counters_repo.clone(), habit_repo.clone());
    let habits = HabitService::new(habit_repo, streak_repo.clone());
    let users = UserService::new(profile_repo);

    let services = TestServices {
        db,
        users,
        habits,
        records,
        freeze,
        recompute,
        streak_repo,
        analytics_repo,
        counters_repo,
    };
    (services, temp_dir)
}

//! SQLite implementations of the core repository ports

pub mod analytics_repository;
pub mod checkin_repository;
pub mod freeze_repository;
pub mod habit_repository;
pub mod manager;
pub mod streak_repository;
pub mod user_counters_repository;
pub mod user_profile_repository;

mod codec;

pub use analytics_repository::SqliteAnalyticsRepository;
pub use checkin_repository::SqliteCheckinRepository;
pub use freeze_repository::SqliteFreezeTokenRepository;
pub use habit_repository::SqliteHabitRepository;
pub use manager::DbManager;
pub use streak_repository::SqliteStreakRepository;
pub use user_counters_repository::SqliteUserCountersRepository;
pub use user_profile_repository::SqliteUserProfileRepository;

//! # Cadence Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Local-day resolution and schedule building
//! - The check-in/skip record ledger and freeze-token ledger
//! - Streak and daily-analytics recomputation with its orchestrator
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `cadence-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod aggregate;
pub mod analytics;
pub mod dates;
pub mod freeze;
pub mod habits;
pub mod records;
pub mod recompute;
pub mod schedule;
pub mod streaks;
pub mod users;

// Re-export specific items to avoid ambiguity
pub use aggregate::{aggregate_completions, target_for};
pub use analytics::ports::AnalyticsRepository;
pub use analytics::AnalyticsService;
pub use dates::{parse_timezone, period_bounds, resolve_local_day};
pub use freeze::ports::{FreezeTokenRepository, UserCountersRepository};
pub use freeze::FreezeService;
pub use habits::ports::HabitRepository;
pub use habits::HabitService;
pub use records::ports::CheckinRepository;
pub use records::{CheckinInput, RecordService};
pub use recompute::{RecomputeOutcome, RecomputeService};
pub use schedule::expected_days;
pub use streaks::ports::StreakRepository;
pub use streaks::StreakService;
pub use users::ports::UserProfileRepository;
pub use users::{ProfileUpdate, UserService};

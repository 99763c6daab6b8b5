//! Domain types and models

pub mod analytics;
pub mod checkin;
pub mod freeze;
pub mod habit;
pub mod user;

// Re-export the full model surface for convenience
pub use analytics::{DailyAnalytics, StreakSnapshot};
pub use checkin::{CheckinRecord, CheckinSource};
pub use freeze::{FreezeStatus, FreezeToken, UserCounters};
pub use habit::{
    DayOfWeek, Habit, HabitDraft, HabitPatch, PerPeriod, ScheduleType, SkipPolicy, TrackType,
};
pub use user::{UserProfile, WeekStart};

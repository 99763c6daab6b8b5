//! Domain constants
//!
//! Centralized location for the engine-level constants used throughout the
//! workspace.

/// Number of days of history a streak recomputation scans, ending at the
/// reference day.
pub const STREAK_LOOKBACK_DAYS: i64 = 120;

/// Smoothing factor for the daily strength score EWMA.
pub const EWMA_ALPHA: f64 = 0.2;

/// Maximum number of freeze tokens a user can hold at once.
pub const FREEZE_TOKEN_CAP: i64 = 5;

/// A freeze token can retroactively cover a day up to this many whole weeks
/// in the past.
pub const FREEZE_COVERAGE_WEEKS: i64 = 7;

/// A day boundary can be shifted at most this far from local midnight, in
/// either direction.
pub const MAX_DAY_BOUNDARY_OFFSET_MINUTES: i32 = 720;

// Input length caps
pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;
pub const MAX_NOTE_LENGTH: usize = 512;

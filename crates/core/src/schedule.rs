//! Expected-day sequence building
//!
//! The expected-day sequence is the backbone streak evaluation walks: a day
//! that is not in the sequence is invisible to the streak, neither a success
//! nor a break.

use cadence_domain::{DayOfWeek, ScheduleType};
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::dates::{day_start_utc, resolve_local_day, weekday_in_zone};

/// Build the ascending, duplicate-free sequence of local days a habit is due
/// on within `[window_start, window_end]`.
///
/// Monthly schedules expect every calendar day (monthly targets are period
/// totals evaluated elsewhere; day-level streaks treat each day as a
/// candidate). All other schedules expect a day when `allowed_days` is empty
/// (every day allowed) or contains the day's weekday computed in the habit's
/// timezone.
pub fn expected_days(
    schedule: ScheduleType,
    allowed_days: &[DayOfWeek],
    tz: Tz,
    offset_minutes: i32,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = Vec::new();
    let mut cursor = window_start;

    while cursor <= window_end {
        let instant = day_start_utc(cursor);
        let local = resolve_local_day(instant, tz, offset_minutes);

        let due = match schedule {
            ScheduleType::Monthly => true,
            _ => allowed_days.is_empty() || allowed_days.contains(&weekday_in_zone(instant, tz)),
        };

        // Offset/timezone shifts can map two cursor days onto one local day
        // (DST transitions); keep the sequence strictly ascending.
        if due && days.last().map_or(true, |&last| last < local) {
            days.push(local);
        }

        cursor = match cursor.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    days
}

//! Local-day resolution and period math
//!
//! A habit's "day" is not necessarily the calendar day: the user lives in a
//! timezone, and the habit may shift its day boundary away from midnight
//! (e.g. a day that ends at 3am). Everything downstream of record creation
//! keys off the local day resolved here, so the resolution must be
//! deterministic and total.

use cadence_domain::{CadenceError, DayOfWeek, Result, ScheduleType, WeekStart};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone identifier.
///
/// An unknown identifier is a fatal input error; callers are expected to
/// validate timezones at the profile boundary.
pub fn parse_timezone(timezone: &str) -> Result<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|_| CadenceError::InvalidInput(format!("unknown timezone identifier: {timezone}")))
}

/// Resolve the local day an instant belongs to.
///
/// The instant is shifted by the day-boundary offset (negative offsets fold
/// late-night activity into the previous calendar day), then converted into
/// the timezone's wall clock; the wall-clock date is the local day.
pub fn resolve_local_day(instant: DateTime<Utc>, tz: Tz, offset_minutes: i32) -> NaiveDate {
    let shifted = instant + Duration::minutes(i64::from(offset_minutes));
    shifted.with_timezone(&tz).date_naive()
}

/// Weekday of an instant in the given timezone.
///
/// Schedule filtering uses the un-shifted wall-clock weekday; the boundary
/// offset only moves the day bucket, not which weekday a date is.
pub fn weekday_in_zone(instant: DateTime<Utc>, tz: Tz) -> DayOfWeek {
    DayOfWeek::from(instant.with_timezone(&tz).weekday())
}

/// Midnight UTC at the start of a calendar day.
pub fn day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Inclusive (start, end) bounds of the period a local day falls in.
///
/// Daily and custom schedules are their own single-day period; weekly
/// periods honor the user's week start.
pub fn period_bounds(
    schedule: ScheduleType,
    local_day: NaiveDate,
    week_start: WeekStart,
) -> (NaiveDate, NaiveDate) {
    match schedule {
        ScheduleType::Weekly => {
            let days_into_week = i64::from(match week_start {
                WeekStart::Mon => local_day.weekday().num_days_from_monday(),
                WeekStart::Sun => local_day.weekday().num_days_from_sunday(),
            });
            let start = local_day - Duration::days(days_into_week);
            (start, start + Duration::days(6))
        }
        ScheduleType::Monthly => {
            let start = local_day.with_day(1).unwrap_or(local_day);
            let next_month = if local_day.month() == 12 {
                NaiveDate::from_ymd_opt(local_day.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(local_day.year(), local_day.month() + 1, 1)
            };
            let end = next_month.map_or(local_day, |first| first - Duration::days(1));
            (start, end)
        }
        ScheduleType::Daily | ScheduleType::Custom => (local_day, local_day),
    }
}

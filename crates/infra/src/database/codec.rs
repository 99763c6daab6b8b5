//! Shared column conversion helpers for the SQLite repositories.

use cadence_domain::DayOfWeek;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;

/// Unix-second timestamp column → UTC instant.
pub(crate) fn datetime_from_ts(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

/// Parse a `YYYY-MM-DD` TEXT column.
pub(crate) fn date_from_text(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    value.parse().map_err(|_| column_error(idx, "local day", value))
}

/// Conversion failure for a text column holding a domain value.
pub(crate) fn column_error(idx: usize, what: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("invalid {what}: {value}").into(),
    )
}

/// Serialize an allowed-days list to its JSON storage form.
pub(crate) fn allowed_days_to_json(days: &[DayOfWeek]) -> String {
    serde_json::to_string(days).unwrap_or_else(|_| "[]".into())
}

/// Parse the allowed-days JSON storage form.
pub(crate) fn allowed_days_from_json(idx: usize, value: &str) -> rusqlite::Result<Vec<DayOfWeek>> {
    serde_json::from_str(value).map_err(|_| column_error(idx, "allowed days", value))
}

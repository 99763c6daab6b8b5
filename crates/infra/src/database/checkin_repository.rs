//! Check-in repository implementation using SQLite
//!
//! Persists check-in and skip records. Skip uniqueness is enforced by a
//! partial unique index; a conflicted insert is reported back to the ledger
//! as a non-insert instead of an error.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::CheckinRepository as CheckinRepositoryPort;
use cadence_domain::{CadenceError, CheckinRecord, CheckinSource, Result as DomainResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::{column_error, date_from_text, datetime_from_ts};
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `CheckinRepository`
pub struct SqliteCheckinRepository {
    db: Arc<DbManager>,
}

impl SqliteCheckinRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CheckinRepositoryPort for SqliteCheckinRepository {
    async fn insert_checkin(&self, record: CheckinRecord) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_record(&conn, &record, false).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert_skip(&self, record: CheckinRecord) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let inserted = insert_record(&conn, &record, true).map_err(map_sql_error)?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_completion(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> DomainResult<Option<CheckinRecord>> {
        self.find_one(habit_id, user_id, local_day, false).await
    }

    async fn find_skip(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> DomainResult<Option<CheckinRecord>> {
        self.find_one(habit_id, user_id, local_day, true).await
    }

    async fn get_records_for_day(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
    ) -> DomainResult<Vec<CheckinRecord>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<CheckinRecord>> {
            let conn = db.get_connection()?;
            query_records_for_day(&conn, &habit_id, &user_id, local_day).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_records_in_range(
        &self,
        habit_id: &str,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<CheckinRecord>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<CheckinRecord>> {
            let conn = db.get_connection()?;
            query_records_in_range(&conn, &habit_id, &user_id, start, end).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_records(
        &self,
        habit_id: &str,
        user_id: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> DomainResult<Vec<CheckinRecord>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<CheckinRecord>> {
            let conn = db.get_connection()?;
            query_records_newest_first(&conn, &habit_id, &user_id, range).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

impl SqliteCheckinRepository {
    async fn find_one(
        &self,
        habit_id: &str,
        user_id: &str,
        local_day: NaiveDate,
        is_skip: bool,
    ) -> DomainResult<Option<CheckinRecord>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<CheckinRecord>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, habit_id, user_id, occurred_at, local_day, quantity, source, note,
                        is_skip, created_at
                 FROM checkins
                 WHERE habit_id = ?1 AND user_id = ?2 AND local_day = ?3 AND is_skip = ?4
                 LIMIT 1",
                params![&habit_id, &user_id, local_day.to_string(), is_skip],
                map_checkin_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const CHECKIN_COLUMNS: &str = "id, habit_id, user_id, occurred_at, local_day, quantity, source, \
                               note, is_skip, created_at";

/// Map a row to a CheckinRecord
fn map_checkin_row(row: &Row<'_>) -> rusqlite::Result<CheckinRecord> {
    let local_day: String = row.get(4)?;
    let source: String = row.get(6)?;

    Ok(CheckinRecord {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        user_id: row.get(2)?,
        occurred_at: datetime_from_ts(row.get(3)?),
        local_day: date_from_text(4, &local_day)?,
        quantity: row.get(5)?,
        source: CheckinSource::parse(&source)
            .ok_or_else(|| column_error(6, "checkin source", &source))?,
        note: row.get(7)?,
        is_skip: row.get(8)?,
        created_at: datetime_from_ts(row.get(9)?),
    })
}

/// Insert a record; skips go through OR IGNORE so the partial unique index
/// reports a lost race as zero changed rows.
fn insert_record(
    conn: &Connection,
    record: &CheckinRecord,
    or_ignore: bool,
) -> rusqlite::Result<usize> {
    let sql = if or_ignore {
        "INSERT OR IGNORE INTO checkins (id, habit_id, user_id, occurred_at, local_day, quantity,
                                         source, note, is_skip, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    } else {
        "INSERT INTO checkins (id, habit_id, user_id, occurred_at, local_day, quantity,
                               source, note, is_skip, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    };

    conn.execute(
        sql,
        params![
            &record.id,
            &record.habit_id,
            &record.user_id,
            record.occurred_at.timestamp(),
            record.local_day.to_string(),
            record.quantity,
            record.source.as_str(),
            &record.note,
            record.is_skip,
            record.created_at.timestamp(),
        ],
    )
}

/// Query all records for one local day
fn query_records_for_day(
    conn: &Connection,
    habit_id: &str,
    user_id: &str,
    local_day: NaiveDate,
) -> rusqlite::Result<Vec<CheckinRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHECKIN_COLUMNS}
         FROM checkins
         WHERE habit_id = ?1 AND user_id = ?2 AND local_day = ?3
         ORDER BY occurred_at ASC"
    ))?;

    let rows = stmt
        .query_map(params![habit_id, user_id, local_day.to_string()], map_checkin_row)?
        .collect();
    rows
}

/// Query records within a local-day range, oldest first
fn query_records_in_range(
    conn: &Connection,
    habit_id: &str,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<Vec<CheckinRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CHECKIN_COLUMNS}
         FROM checkins
         WHERE habit_id = ?1 AND user_id = ?2 AND local_day >= ?3 AND local_day <= ?4
         ORDER BY local_day ASC, occurred_at ASC"
    ))?;

    let rows = stmt
        .query_map(
            params![habit_id, user_id, start.to_string(), end.to_string()],
            map_checkin_row,
        )?
        .collect();
    rows
}

/// Query records for listing, newest first, optionally range-bounded
fn query_records_newest_first(
    conn: &Connection,
    habit_id: &str,
    user_id: &str,
    range: Option<(NaiveDate, NaiveDate)>,
) -> rusqlite::Result<Vec<CheckinRecord>> {
    match range {
        Some((start, end)) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHECKIN_COLUMNS}
                 FROM checkins
                 WHERE habit_id = ?1 AND user_id = ?2 AND local_day >= ?3 AND local_day <= ?4
                 ORDER BY local_day DESC, occurred_at DESC"
            ))?;
            let rows = stmt
                .query_map(
                    params![habit_id, user_id, start.to_string(), end.to_string()],
                    map_checkin_row,
                )?
                .collect();
            rows
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHECKIN_COLUMNS}
                 FROM checkins
                 WHERE habit_id = ?1 AND user_id = ?2
                 ORDER BY local_day DESC, occurred_at DESC"
            ))?;
            let rows = stmt.query_map(params![habit_id, user_id], map_checkin_row)?.collect();
            rows
        }
    }
}

fn map_join_error(err: task::JoinError) -> CadenceError {
    CadenceError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================

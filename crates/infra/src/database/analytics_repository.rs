//! Daily analytics repository implementation using SQLite
//!
//! One row per (habit, date), replaced in place on every recomputation.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::AnalyticsRepository as AnalyticsRepositoryPort;
use cadence_domain::{CadenceError, DailyAnalytics, Result as DomainResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::{date_from_text, datetime_from_ts};
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `AnalyticsRepository`
pub struct SqliteAnalyticsRepository {
    db: Arc<DbManager>,
}

impl SqliteAnalyticsRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnalyticsRepositoryPort for SqliteAnalyticsRepository {
    async fn upsert_day(&self, analytics: DailyAnalytics) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_day(&conn, &analytics).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_day(
        &self,
        habit_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Option<DailyAnalytics>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<DailyAnalytics>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!(
                    "SELECT {ANALYTICS_COLUMNS}
                     FROM habit_analytics_daily
                     WHERE habit_id = ?1 AND date = ?2"
                ),
                params![&habit_id, date.to_string()],
                map_analytics_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_range(
        &self,
        habit_id: &str,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<DailyAnalytics>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<DailyAnalytics>> {
            let conn = db.get_connection()?;
            query_range(&conn, &habit_id, &user_id, start, end).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const ANALYTICS_COLUMNS: &str =
    "habit_id, user_id, date, completions, target, completion_rate, strength_score, updated_at";

/// Map a row to a DailyAnalytics
fn map_analytics_row(row: &Row<'_>) -> rusqlite::Result<DailyAnalytics> {
    let date: String = row.get(2)?;

    Ok(DailyAnalytics {
        habit_id: row.get(0)?,
        user_id: row.get(1)?,
        date: date_from_text(2, &date)?,
        completions: row.get(3)?,
        target: row.get(4)?,
        completion_rate: row.get(5)?,
        strength_score: row.get(6)?,
        updated_at: datetime_from_ts(row.get(7)?),
    })
}

/// Replace the row for (habit, date)
fn upsert_day(conn: &Connection, analytics: &DailyAnalytics) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO habit_analytics_daily (habit_id, user_id, date, completions, target,
                                            completion_rate, strength_score, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(habit_id, date) DO UPDATE SET
             completions = excluded.completions,
             target = excluded.target,
             completion_rate = excluded.completion_rate,
             strength_score = excluded.strength_score,
             updated_at = excluded.updated_at",
        params![
            &analytics.habit_id,
            &analytics.user_id,
            analytics.date.to_string(),
            analytics.completions,
            analytics.target,
            analytics.completion_rate,
            analytics.strength_score,
            analytics.updated_at.timestamp(),
        ],
    )?;
    Ok(())
}

/// Query rows for a habit within a date range, ascending
fn query_range(
    conn: &Connection,
    habit_id: &str,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<Vec<DailyAnalytics>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ANALYTICS_COLUMNS}
         FROM habit_analytics_daily
         WHERE habit_id = ?1 AND user_id = ?2 AND date >= ?3 AND date <= ?4
         ORDER BY date ASC"
    ))?;

    let rows = stmt
        .query_map(
            params![habit_id, user_id, start.to_string(), end.to_string()],
            map_analytics_row,
        )?
        .collect();
    rows
}

fn map_join_error(err: task::JoinError) -> CadenceError {
    CadenceError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================

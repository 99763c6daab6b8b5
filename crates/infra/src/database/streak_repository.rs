//! Streak snapshot repository implementation using SQLite
//!
//! One row per habit, replaced in place on every recomputation.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::StreakRepository as StreakRepositoryPort;
use cadence_domain::{CadenceError, Result as DomainResult, StreakSnapshot};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::{date_from_text, datetime_from_ts};
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `StreakRepository`
pub struct SqliteStreakRepository {
    db: Arc<DbManager>,
}

impl SqliteStreakRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StreakRepositoryPort for SqliteStreakRepository {
    async fn upsert_snapshot(&self, snapshot: StreakSnapshot) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_snapshot(&conn, &snapshot).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_snapshot(&self, habit_id: &str) -> DomainResult<Option<StreakSnapshot>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<StreakSnapshot>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT habit_id, user_id, current_streak, longest_streak,
                        last_success_local_day, updated_at
                 FROM streaks WHERE habit_id = ?1",
                params![&habit_id],
                map_snapshot_row,
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

/// Map a row to a StreakSnapshot
fn map_snapshot_row(row: &Row<'_>) -> rusqlite::Result<StreakSnapshot> {
    let last_success: Option<String> = row.get(4)?;

    Ok(StreakSnapshot {
        habit_id: row.get(0)?,
        user_id: row.get(1)?,
        current_streak: row.get(2)?,
        longest_streak: row.get(3)?,
        last_success_local_day: last_success
            .map(|value| date_from_text(4, &value))
            .transpose()?,
        updated_at: datetime_from_ts(row.get(5)?),
    })
}

/// Replace the snapshot for a habit
fn upsert_snapshot(conn: &Connection, snapshot: &StreakSnapshot) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO streaks (habit_id, user_id, current_streak, longest_streak,
                              last_success_local_day, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(habit_id) DO UPDATE SET
             current_streak = excluded.current_streak,
             longest_streak = excluded.longest_streak,
             last_success_local_day = excluded.last_success_local_day,
             updated_at = excluded.updated_at",
        params![
            &snapshot.habit_id,
            &snapshot.user_id,
            snapshot.current_streak,
            snapshot.longest_streak,
            snapshot.last_success_local_day.map(|day| day.to_string()),
            snapshot.updated_at.timestamp(),
        ],
    )?;
    Ok(())
}

fn map_join_error(err: task::JoinError) -> CadenceError {
    CadenceError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================

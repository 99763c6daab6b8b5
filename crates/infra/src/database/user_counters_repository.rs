//! User counters repository implementation using SQLite
//!
//! Single summary row per user, replaced in place.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::UserCountersRepository as UserCountersRepositoryPort;
use cadence_domain::{CadenceError, Result as DomainResult, UserCounters};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::datetime_from_ts;
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `UserCountersRepository`
pub struct SqliteUserCountersRepository {
    db: Arc<DbManager>,
}

impl SqliteUserCountersRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCountersRepositoryPort for SqliteUserCountersRepository {
    async fn get(&self, user_id: &str) -> DomainResult<Option<UserCounters>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserCounters>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT user_id, freeze_tokens_available, last_freeze_grant_at, updated_at
                 FROM user_counters WHERE user_id = ?1",
                params![&user_id],
                map_counters_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert(&self, counters: UserCounters) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_counters(&conn, &counters).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row to UserCounters
fn map_counters_row(row: &Row<'_>) -> rusqlite::Result<UserCounters> {
    Ok(UserCounters {
        user_id: row.get(0)?,
        freeze_tokens_available: row.get(1)?,
        last_freeze_grant_at: row.get::<_, Option<i64>>(2)?.map(datetime_from_ts),
        updated_at: datetime_from_ts(row.get(3)?),
    })
}

/// Replace the counters row for a user
fn upsert_counters(conn: &Connection, counters: &UserCounters) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO user_counters (user_id, freeze_tokens_available, last_freeze_grant_at,
                                    updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             freeze_tokens_available = excluded.freeze_tokens_available,
             last_freeze_grant_at = excluded.last_freeze_grant_at,
             updated_at = excluded.updated_at",
        params![
            &counters.user_id,
            counters.freeze_tokens_available,
            counters.last_freeze_grant_at.map(|at| at.timestamp()),
            counters.updated_at.timestamp(),
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

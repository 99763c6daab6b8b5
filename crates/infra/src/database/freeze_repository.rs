//! Freeze token repository implementation using SQLite
//!
//! Token activation claims the oldest available token inside a transaction
//! so concurrent activations cannot consume the same token twice.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::FreezeTokenRepository as FreezeTokenRepositoryPort;
use cadence_domain::{
    CadenceError, FreezeStatus, FreezeToken, Result as DomainResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::{column_error, date_from_text, datetime_from_ts};
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `FreezeTokenRepository`
pub struct SqliteFreezeTokenRepository {
    db: Arc<DbManager>,
}

impl SqliteFreezeTokenRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FreezeTokenRepositoryPort for SqliteFreezeTokenRepository {
    async fn insert_tokens(&self, tokens: Vec<FreezeToken>) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            for token in &tokens {
                insert_token(&tx, token).map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn use_oldest_available(
        &self,
        user_id: &str,
        covered_habit_id: Option<&str>,
        covered_local_day: NaiveDate,
        used_at: DateTime<Utc>,
    ) -> DomainResult<Option<FreezeToken>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let covered_habit_id = covered_habit_id.map(ToString::to_string);

        task::spawn_blocking(move || -> DomainResult<Option<FreezeToken>> {
            let mut conn = db.get_connection()?;
            claim_oldest_available(
                &mut conn,
                &user_id,
                covered_habit_id.as_deref(),
                covered_local_day,
                used_at,
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_used_covering(
        &self,
        user_id: &str,
        habit_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<FreezeToken>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let habit_id = habit_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<FreezeToken>> {
            let conn = db.get_connection()?;
            query_used_covering(&conn, &user_id, &habit_id, start, end).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const TOKEN_COLUMNS: &str =
    "id, user_id, status, granted_at, used_at, expires_at, covered_habit_id, covered_local_day";

/// Map a row to a FreezeToken
fn map_token_row(row: &Row<'_>) -> rusqlite::Result<FreezeToken> {
    let status: String = row.get(2)?;
    let covered_local_day: Option<String> = row.get(7)?;

    Ok(FreezeToken {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: FreezeStatus::parse(&status)
            .ok_or_else(|| column_error(2, "freeze status", &status))?,
        granted_at: datetime_from_ts(row.get(3)?),
        used_at: row.get::<_, Option<i64>>(4)?.map(datetime_from_ts),
        expires_at: row.get::<_, Option<i64>>(5)?.map(datetime_from_ts),
        covered_habit_id: row.get(6)?,
        covered_local_day: covered_local_day
            .map(|value| date_from_text(7, &value))
            .transpose()?,
    })
}

/// Insert a token
fn insert_token(conn: &Connection, token: &FreezeToken) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO freeze_tokens (id, user_id, status, granted_at, used_at, expires_at,
                                    covered_habit_id, covered_local_day)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &token.id,
            &token.user_id,
            token.status.as_str(),
            token.granted_at.timestamp(),
            token.used_at.map(|at| at.timestamp()),
            token.expires_at.map(|at| at.timestamp()),
            &token.covered_habit_id,
            token.covered_local_day.map(|day| day.to_string()),
        ],
    )?;
    Ok(())
}

/// Claim the oldest available token for a user inside one transaction.
fn claim_oldest_available(
    conn: &mut Connection,
    user_id: &str,
    covered_habit_id: Option<&str>,
    covered_local_day: NaiveDate,
    used_at: DateTime<Utc>,
) -> rusqlite::Result<Option<FreezeToken>> {
    let tx = conn.transaction()?;

    let token_id: Option<String> = tx
        .query_row(
            "SELECT id FROM freeze_tokens
             WHERE user_id = ?1 AND status = 'available'
             ORDER BY granted_at ASC, id ASC
             LIMIT 1",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(token_id) = token_id else {
        return Ok(None);
    };

    tx.execute(
        "UPDATE freeze_tokens
         SET status = 'used', used_at = ?1, covered_habit_id = ?2, covered_local_day = ?3
         WHERE id = ?4",
        params![
            used_at.timestamp(),
            covered_habit_id,
            covered_local_day.to_string(),
            &token_id
        ],
    )?;

    let token = tx.query_row(
        &format!("SELECT {TOKEN_COLUMNS} FROM freeze_tokens WHERE id = ?1"),
        params![&token_id],
        map_token_row,
    )?;

    tx.commit()?;
    Ok(Some(token))
}

/// Query used tokens covering a habit within a date range
fn query_used_covering(
    conn: &Connection,
    user_id: &str,
    habit_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<Vec<FreezeToken>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TOKEN_COLUMNS}
         FROM freeze_tokens
         WHERE user_id = ?1 AND status = 'used' AND covered_habit_id = ?2
           AND covered_local_day >= ?3 AND covered_local_day <= ?4
         ORDER BY covered_local_day ASC"
    ))?;

    let rows = stmt
        .query_map(
            params![user_id, habit_id, start.to_string(), end.to_string()],
            map_token_row,
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

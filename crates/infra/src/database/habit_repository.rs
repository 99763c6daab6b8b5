//! Habit repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::HabitRepository as HabitRepositoryPort;
use cadence_domain::{
    CadenceError, Habit, PerPeriod, Result as DomainResult, ScheduleType, SkipPolicy, TrackType,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::{allowed_days_from_json, allowed_days_to_json, column_error, datetime_from_ts};
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `HabitRepository`
pub struct SqliteHabitRepository {
    db: Arc<DbManager>,
}

impl SqliteHabitRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HabitRepositoryPort for SqliteHabitRepository {
    async fn insert_habit(&self, habit: Habit) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_habit(&conn, &habit).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_habit(&self, habit_id: &str, user_id: &str) -> DomainResult<Option<Habit>> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Habit>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND user_id = ?2"),
                params![&habit_id, &user_id],
                map_habit_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_habits(&self, user_id: &str) -> DomainResult<Vec<Habit>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Habit>> {
            let conn = db.get_connection()?;
            query_habits_for_user(&conn, &user_id).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_habit(&self, habit: Habit) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_habit(&conn, &habit).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_habit(&self, habit_id: &str, user_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let habit_id = habit_id.to_string();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
                params![&habit_id, &user_id],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const HABIT_COLUMNS: &str = "id, user_id, title, description, icon, color, category, track_type, \
                             schedule_type, count_target, per_period, allowed_days, \
                             day_boundary_offset_minutes, skip_policy, freeze_enabled, \
                             is_archived, created_at, updated_at";

/// Map a row to a Habit
fn map_habit_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let track_type: String = row.get(7)?;
    let schedule_type: String = row.get(8)?;
    let per_period: Option<String> = row.get(10)?;
    let allowed_days: String = row.get(11)?;
    let skip_policy: String = row.get(13)?;

    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        category: row.get(6)?,
        track_type: TrackType::parse(&track_type)
            .ok_or_else(|| column_error(7, "track type", &track_type))?,
        schedule_type: ScheduleType::parse(&schedule_type)
            .ok_or_else(|| column_error(8, "schedule type", &schedule_type))?,
        count_target: row.get(9)?,
        per_period: per_period
            .map(|value| {
                PerPeriod::parse(&value).ok_or_else(|| column_error(10, "per period", &value))
            })
            .transpose()?,
        allowed_days: allowed_days_from_json(11, &allowed_days)?,
        day_boundary_offset_minutes: row.get(12)?,
        skip_policy: SkipPolicy::parse(&skip_policy)
            .ok_or_else(|| column_error(13, "skip policy", &skip_policy))?,
        freeze_enabled: row.get(14)?,
        is_archived: row.get(15)?,
        created_at: datetime_from_ts(row.get(16)?),
        updated_at: datetime_from_ts(row.get(17)?),
    })
}

/// Insert a habit
fn insert_habit(conn: &Connection, habit: &Habit) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO habits (id, user_id, title, description, icon, color, category, track_type,
                             schedule_type, count_target, per_period, allowed_days,
                             day_boundary_offset_minutes, skip_policy, freeze_enabled,
                             is_archived, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            &habit.id,
            &habit.user_id,
            &habit.title,
            &habit.description,
            &habit.icon,
            &habit.color,
            &habit.category,
            habit.track_type.as_str(),
            habit.schedule_type.as_str(),
            habit.count_target,
            habit.per_period.map(PerPeriod::as_str),
            allowed_days_to_json(&habit.allowed_days),
            habit.day_boundary_offset_minutes,
            habit.skip_policy.as_str(),
            habit.freeze_enabled,
            habit.is_archived,
            habit.created_at.timestamp(),
            habit.updated_at.timestamp(),
        ],
    )?;
    Ok(())
}

/// Replace a habit row
fn update_habit(conn: &Connection, habit: &Habit) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE habits
         SET title = ?1, description = ?2, icon = ?3, color = ?4, category = ?5,
             count_target = ?6, per_period = ?7, allowed_days = ?8,
             day_boundary_offset_minutes = ?9, skip_policy = ?10, freeze_enabled = ?11,
             is_archived = ?12, updated_at = ?13
         WHERE id = ?14 AND user_id = ?15",
        params![
            &habit.title,
            &habit.description,
            &habit.icon,
            &habit.color,
            &habit.category,
            habit.count_target,
            habit.per_period.map(PerPeriod::as_str),
            allowed_days_to_json(&habit.allowed_days),
            habit.day_boundary_offset_minutes,
            habit.skip_policy.as_str(),
            habit.freeze_enabled,
            habit.is_archived,
            habit.updated_at.timestamp(),
            &habit.id,
            &habit.user_id,
        ],
    )?;
    Ok(())
}

/// Query all habits owned by a user
fn query_habits_for_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ?1 ORDER BY created_at ASC, id ASC"
    ))?;

    let rows = stmt.query_map(params![user_id], map_habit_row)?.collect();
    rows
}

fn map_join_error(err: task::JoinError) -> CadenceError {
    CadenceError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================

//! User profile repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::UserProfileRepository as UserProfileRepositoryPort;
use cadence_domain::{CadenceError, Result as DomainResult, UserProfile, WeekStart};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::codec::{column_error, datetime_from_ts};
use super::manager::{map_sql_error, DbManager};

/// SQLite-backed implementation of `UserProfileRepository`
pub struct SqliteUserProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteUserProfileRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserProfileRepositoryPort for SqliteUserProfileRepository {
    async fn find_profile(&self, user_id: &str) -> DomainResult<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserProfile>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, email, timezone, week_start, preferences, created_at, last_active_at
                 FROM users WHERE id = ?1",
                params![&user_id],
                map_profile_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert_profile(&self, profile: UserProfile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_profile(&conn, &profile).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_profile(&self, profile: UserProfile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_profile(&conn, &profile).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn touch_last_active(&self, user_id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE users SET last_active_at = ?1 WHERE id = ?2",
                params![at.timestamp(), &user_id],
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

/// Map a row to a UserProfile
fn map_profile_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let week_start: String = row.get(3)?;
    let preferences: String = row.get(4)?;

    Ok(UserProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        timezone: row.get(2)?,
        week_start: WeekStart::parse(&week_start)
            .ok_or_else(|| column_error(3, "week start", &week_start))?,
        preferences: serde_json::from_str(&preferences)
            .map_err(|_| column_error(4, "preferences", &preferences))?,
        created_at: datetime_from_ts(row.get(5)?),
        last_active_at: row.get::<_, Option<i64>>(6)?.map(datetime_from_ts),
    })
}

/// Insert a profile
fn insert_profile(conn: &Connection, profile: &UserProfile) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, timezone, week_start, preferences, created_at,
                            last_active_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &profile.id,
            &profile.email,
            &profile.timezone,
            profile.week_start.as_str(),
            profile.preferences.to_string(),
            profile.created_at.timestamp(),
            profile.last_active_at.map(|at| at.timestamp()),
        ],
    )?;
    Ok(())
}

/// Replace a profile row
fn update_profile(conn: &Connection, profile: &UserProfile) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE users
         SET email = ?1, timezone = ?2, week_start = ?3, preferences = ?4, last_active_at = ?5
         WHERE id = ?6",
        params![
            &profile.email,
            &profile.timezone,
            profile.week_start.as_str(),
            profile.preferences.to_string(),
            profile.last_active_at.map(|at| at.timestamp()),
            &profile.id,
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

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path, 5).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    fn test_profile() -> UserProfile {
        UserProfile {
            id: "user-1".into(),
            email: Some("a@example.com".into()),
            timezone: "Europe/Berlin".into(),
            week_start: WeekStart::Sun,
            preferences: serde_json::json!({"theme": "dark"}),
            created_at: Utc::now(),
            last_active_at: None,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_and_find_profile() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserProfileRepository::new(db);

        repo.insert_profile(test_profile()).await.expect("insert");

        let found = repo.find_profile("user-1").await.expect("find").expect("profile exists");
        assert_eq!(found.timezone, "Europe/Berlin");
        assert_eq!(found.week_start, WeekStart::Sun);
        assert_eq!(found.preferences["theme"], "dark");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_profile() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserProfileRepository::new(db);
        let mut profile = test_profile();
        repo.insert_profile(profile.clone()).await.expect("insert");

        profile.timezone = "America/New_York".into();
        repo.update_profile(profile).await.expect("update");

        let found = repo.find_profile("user-1").await.expect("find").expect("profile exists");
        assert_eq!(found.timezone, "America/New_York");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_touch_last_active() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteUserProfileRepository::new(db);
        repo.insert_profile(test_profile()).await.expect("insert");

        let at = Utc::now();
        repo.touch_last_active("user-1", at).await.expect("touch");

        let found = repo.find_profile("user-1").await.expect("find").expect("profile exists");
        assert_eq!(found.last_active_at.map(|t| t.timestamp()), Some(at.timestamp()));
    }
}

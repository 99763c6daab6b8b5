//! User profile service - core business logic

use std::sync::Arc;

use cadence_domain::{Result, UserProfile, WeekStart};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::ports::UserProfileRepository;
use crate::dates::parse_timezone;

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub timezone: Option<String>,
    pub week_start: Option<WeekStart>,
    pub preferences: Option<Value>,
}

/// User profile service
///
/// Identity provisioning happens upstream; this service keeps the local
/// profile row the engine reads timezones and week starts from.
pub struct UserService {
    users: Arc<dyn UserProfileRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(users: Arc<dyn UserProfileRepository>) -> Self {
        Self { users }
    }

    /// Fetch the profile for an already-authenticated user, creating it with
    /// defaults on first sight and stamping last-active on every call.
    pub async fn ensure_user(
        &self,
        user_id: &str,
        email: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<UserProfile> {
        let now = Utc::now();

        if let Some(existing) = self.users.find_profile(user_id).await? {
            self.users.touch_last_active(user_id, now).await?;
            return Ok(existing);
        }

        let timezone = timezone.unwrap_or("UTC");
        parse_timezone(timezone)?;

        let profile = UserProfile {
            id: user_id.to_string(),
            email: email.map(ToString::to_string),
            timezone: timezone.to_string(),
            week_start: WeekStart::default(),
            preferences: serde_json::json!({}),
            created_at: now,
            last_active_at: Some(now),
        };
        self.users.insert_profile(profile.clone()).await?;
        info!(user_id, "user profile created");

        Ok(profile)
    }

    /// Apply a partial profile update and return the merged profile.
    pub async fn update_profile(
        &self,
        user: &UserProfile,
        update: ProfileUpdate,
    ) -> Result<UserProfile> {
        let mut profile = user.clone();

        if let Some(timezone) = update.timezone {
            parse_timezone(&timezone)?;
            profile.timezone = timezone;
        }
        if let Some(week_start) = update.week_start {
            profile.week_start = week_start;
        }
        if let Some(preferences) = update.preferences {
            profile.preferences = preferences;
        }

        self.users.update_profile(profile.clone()).await?;
        Ok(profile)
    }
}

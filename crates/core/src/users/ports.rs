//! Port interfaces for user profiles

use async_trait::async_trait;
use cadence_domain::{Result, UserProfile};
use chrono::{DateTime, Utc};

/// Trait for persisting user profiles
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Find a profile by id
    async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Insert a new profile
    async fn insert_profile(&self, profile: UserProfile) -> Result<()>;

    /// Replace a profile row
    async fn update_profile(&self, profile: UserProfile) -> Result<()>;

    /// Stamp the last-active timestamp
    async fn touch_last_active(&self, user_id: &str, at: DateTime<Utc>) -> Result<()>;
}

//! Port interfaces for habit configuration

use async_trait::async_trait;
use cadence_domain::{Habit, Result};

/// Trait for persisting habit configuration
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Insert a new habit
    async fn insert_habit(&self, habit: Habit) -> Result<()>;

    /// Find a habit by id scoped to its owner
    async fn find_habit(&self, habit_id: &str, user_id: &str) -> Result<Option<Habit>>;

    /// All habits owned by a user
    async fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>>;

    /// Replace a habit row with its updated configuration
    async fn update_habit(&self, habit: Habit) -> Result<()>;

    /// Delete a habit; storage cascades its records and derived rows
    async fn delete_habit(&self, habit_id: &str, user_id: &str) -> Result<()>;
}

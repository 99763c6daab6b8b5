//! Port interfaces for streak snapshots

use async_trait::async_trait;
use cadence_domain::{Result, StreakSnapshot};

/// Trait for persisting recomputed streak snapshots
///
/// Snapshots are replaced in place, one row per habit; history is never
/// appended.
#[async_trait]
pub trait StreakRepository: Send + Sync {
    /// Upsert the snapshot for a habit
    async fn upsert_snapshot(&self, snapshot: StreakSnapshot) -> Result<()>;

    /// Get the snapshot for a habit, if one exists
    async fn get_snapshot(&self, habit_id: &str) -> Result<Option<StreakSnapshot>>;
}

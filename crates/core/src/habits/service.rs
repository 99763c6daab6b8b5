//! Habit management service - core business logic

use std::collections::BTreeSet;
use std::sync::Arc;

use cadence_domain::constants::{
    MAX_DAY_BOUNDARY_OFFSET_MINUTES, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
use cadence_domain::{
    CadenceError, DayOfWeek, Habit, HabitDraft, HabitPatch, Result, ScheduleType, SkipPolicy,
    StreakSnapshot, UserProfile,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::ports::HabitRepository;
use crate::streaks::ports::StreakRepository;

/// Habit management service
pub struct HabitService {
    habits: Arc<dyn HabitRepository>,
    streaks: Arc<dyn StreakRepository>,
}

impl HabitService {
    /// Create a new habit service
    pub fn new(habits: Arc<dyn HabitRepository>, streaks: Arc<dyn StreakRepository>) -> Self {
        Self { habits, streaks }
    }

    /// Create a habit together with its zeroed streak snapshot.
    pub async fn create_habit(&self, user: &UserProfile, draft: HabitDraft) -> Result<Habit> {
        validate_draft(&draft)?;

        let now = Utc::now();
        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            title: draft.title,
            description: draft.description,
            icon: draft.icon,
            color: draft.color,
            category: draft.category,
            track_type: draft.track_type,
            schedule_type: draft.schedule_type,
            count_target: draft.count_target,
            per_period: draft.per_period,
            allowed_days: draft.allowed_days,
            day_boundary_offset_minutes: draft.day_boundary_offset_minutes.unwrap_or(0),
            skip_policy: draft.skip_policy.unwrap_or(SkipPolicy::None),
            freeze_enabled: draft.freeze_enabled.unwrap_or(true),
            is_archived: false,
            created_at: now,
            updated_at: now,
        };

        self.habits.insert_habit(habit.clone()).await?;
        self.streaks.upsert_snapshot(StreakSnapshot::zeroed(&habit.id, &habit.user_id)).await?;
        info!(habit_id = %habit.id, user_id = %habit.user_id, "habit created");

        Ok(habit)
    }

    /// Fetch a habit owned by the user or fail with `NotFound`.
    pub async fn get_habit(&self, habit_id: &str, user: &UserProfile) -> Result<Habit> {
        self.habits
            .find_habit(habit_id, &user.id)
            .await?
            .ok_or_else(|| CadenceError::NotFound("habit not found".into()))
    }

    /// All habits owned by the user.
    pub async fn list_habits(&self, user: &UserProfile) -> Result<Vec<Habit>> {
        self.habits.list_habits(&user.id).await
    }

    /// Apply a partial update to a habit and return the merged result.
    pub async fn update_habit(
        &self,
        habit_id: &str,
        user: &UserProfile,
        patch: HabitPatch,
    ) -> Result<Habit> {
        if patch.is_empty() {
            return self.get_habit(habit_id, user).await;
        }
        validate_patch(&patch)?;

        let mut habit = self.get_habit(habit_id, user).await?;
        apply_patch(&mut habit, patch);
        habit.updated_at = Utc::now();

        self.habits.update_habit(habit.clone()).await?;
        Ok(habit)
    }

    /// Delete a habit; records and derived rows cascade in storage.
    pub async fn delete_habit(&self, habit_id: &str, user: &UserProfile) -> Result<()> {
        self.habits.delete_habit(habit_id, &user.id).await?;
        info!(habit_id, user_id = %user.id, "habit deleted");
        Ok(())
    }
}

fn validate_draft(draft: &HabitDraft) -> Result<()> {
    if draft.title.is_empty() || draft.title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CadenceError::InvalidInput(format!(
            "title must be between 1 and {MAX_TITLE_LENGTH} characters"
        )));
    }
    if draft
        .description
        .as_ref()
        .is_some_and(|description| description.chars().count() > MAX_DESCRIPTION_LENGTH)
    {
        return Err(CadenceError::InvalidInput(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    if let Some(offset) = draft.day_boundary_offset_minutes {
        validate_boundary_offset(offset)?;
    }
    validate_allowed_days(&draft.allowed_days)?;
    if let Some(target) = draft.count_target {
        validate_count_target(target)?;
    }

    // Weekly and monthly schedules are meaningless without a target
    if matches!(draft.schedule_type, ScheduleType::Weekly | ScheduleType::Monthly)
        && draft.count_target.is_none()
    {
        return Err(CadenceError::InvalidInput(
            "count_target must be provided for weekly and monthly schedules".into(),
        ));
    }

    Ok(())
}

fn validate_patch(patch: &HabitPatch) -> Result<()> {
    if patch
        .title
        .as_ref()
        .is_some_and(|title| title.is_empty() || title.chars().count() > MAX_TITLE_LENGTH)
    {
        return Err(CadenceError::InvalidInput(format!(
            "title must be between 1 and {MAX_TITLE_LENGTH} characters"
        )));
    }
    if let Some(offset) = patch.day_boundary_offset_minutes {
        validate_boundary_offset(offset)?;
    }
    if let Some(allowed_days) = &patch.allowed_days {
        validate_allowed_days(allowed_days)?;
    }
    if let Some(target) = patch.count_target {
        validate_count_target(target)?;
    }
    Ok(())
}

fn validate_boundary_offset(offset: i32) -> Result<()> {
    if offset.abs() > MAX_DAY_BOUNDARY_OFFSET_MINUTES {
        return Err(CadenceError::InvalidInput(format!(
            "day_boundary_offset_minutes must be between -{MAX_DAY_BOUNDARY_OFFSET_MINUTES} and {MAX_DAY_BOUNDARY_OFFSET_MINUTES}"
        )));
    }
    Ok(())
}

fn validate_allowed_days(allowed_days: &[DayOfWeek]) -> Result<()> {
    let unique: BTreeSet<DayOfWeek> = allowed_days.iter().copied().collect();
    if unique.len() != allowed_days.len() {
        return Err(CadenceError::InvalidInput("allowed_days cannot contain duplicates".into()));
    }
    Ok(())
}

fn validate_count_target(target: i64) -> Result<()> {
    if target <= 0 {
        return Err(CadenceError::InvalidInput("count_target must be positive".into()));
    }
    Ok(())
}

fn apply_patch(habit: &mut Habit, patch: HabitPatch) {
    if let Some(title) = patch.title {
        habit.title = title;
    }
    if let Some(description) = patch.description {
        habit.description = Some(description);
    }
    if let Some(icon) = patch.icon {
        habit.icon = Some(icon);
    }
    if let Some(color) = patch.color {
        habit.color = Some(color);
    }
    if let Some(category) = patch.category {
        habit.category = Some(category);
    }
    if let Some(count_target) = patch.count_target {
        habit.count_target = Some(count_target);
    }
    if let Some(per_period) = patch.per_period {
        habit.per_period = Some(per_period);
    }
    if let Some(allowed_days) = patch.allowed_days {
        habit.allowed_days = allowed_days;
    }
    if let Some(offset) = patch.day_boundary_offset_minutes {
        habit.day_boundary_offset_minutes = offset;
    }
    if let Some(skip_policy) = patch.skip_policy {
        habit.skip_policy = skip_policy;
    }
    if let Some(freeze_enabled) = patch.freeze_enabled {
        habit.freeze_enabled = freeze_enabled;
    }
    if let Some(is_archived) = patch.is_archived {
        habit.is_archived = is_archived;
    }
}

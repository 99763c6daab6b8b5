//! End-to-end integration tests over a real SQLite database: the full
//! check-in → recompute flow, cascade deletion, and freeze grant caps.

mod support;

use cadence_core::{CheckinInput, StreakRepository, UserCountersRepository};
use cadence_domain::{HabitDraft, ScheduleType, TrackType, UserCounters};
use chrono::{Duration, Utc};
use support::services;

fn binary_daily_draft() -> HabitDraft {
    HabitDraft {
        title: "Meditate".into(),
        description: None,
        icon: None,
        color: None,
        category: None,
        track_type: TrackType::Binary,
        schedule_type: ScheduleType::Daily,
        count_target: None,
        per_period: None,
        allowed_days: Vec::new(),
        day_boundary_offset_minutes: None,
        skip_policy: None,
        freeze_enabled: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_flow_checkins_skip_and_freeze_build_a_streak() {
    let (services, _temp_dir) = services();
    let now = Utc::now();
    let today = now.date_naive();

    let user = services.users.ensure_user("user-1", None, Some("UTC")).await.expect("user");
    let habit = services.habits.create_habit(&user, binary_daily_draft()).await.expect("habit");

    // Check-ins four, three, and two days ago
    for days_ago in [4, 3, 2] {
        services
            .records
            .create_checkin(
                &user,
                &habit,
                CheckinInput {
                    occurred_at: Some(now - Duration::days(days_ago)),
                    ..Default::default()
                },
            )
            .await
            .expect("check-in");
    }

    // Yesterday skipped
    services
        .records
        .create_skip(&user, &habit, today - Duration::days(1), None)
        .await
        .expect("skip");

    // Today covered by a freeze token
    let counters = services.freeze.grant_if_eligible(&user.id).await.expect("grant");
    assert_eq!(counters.freeze_tokens_available, 1);
    services.freeze.activate(&user.id, Some(habit.id.as_str()), today).await.expect("activate");

    // Freeze activation leaves recomputation to the caller
    let outcome = services.recompute.recompute(&habit, &user, today).await.expect("recompute");

    assert_eq!(outcome.streak.current_streak, 5);
    assert_eq!(outcome.streak.longest_streak, 5);
    assert_eq!(outcome.streak.last_success_local_day, Some(today));

    // The persisted snapshot matches what the orchestrator returned
    let stored = services
        .streak_repo
        .get_snapshot(&habit.id)
        .await
        .expect("get")
        .expect("snapshot exists");
    assert_eq!(stored.current_streak, 5);

    let spent = services.counters_repo.get(&user.id).await.expect("get").expect("counters");
    assert_eq!(spent.freeze_tokens_available, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_habit_cascades_records_and_derived_rows() {
    let (services, _temp_dir) = services();
    let now = Utc::now();

    let user = services.users.ensure_user("user-1", None, Some("UTC")).await.expect("user");
    let habit = services.habits.create_habit(&user, binary_daily_draft()).await.expect("habit");

    services
        .records
        .create_checkin(
            &user,
            &habit,
            CheckinInput { occurred_at: Some(now), ..Default::default() },
        )
        .await
        .expect("check-in");

    services.habits.delete_habit(&habit.id, &user).await.expect("delete");

    let conn = services.db.get_connection().expect("connection");
    for table in ["checkins", "streaks", "habit_analytics_daily", "habits"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 0, "expected {table} to be empty after cascade");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn weekly_grant_is_capped_over_a_long_absence() {
    let (services, _temp_dir) = services();
    let now = Utc::now();

    let user = services.users.ensure_user("user-1", None, Some("UTC")).await.expect("user");

    services
        .counters_repo
        .upsert(UserCounters {
            user_id: user.id.clone(),
            freeze_tokens_available: 0,
            last_freeze_grant_at: Some(now - Duration::weeks(10)),
            updated_at: now,
        })
        .await
        .expect("seed counters");

    let counters = services.freeze.grant_if_eligible(&user.id).await.expect("grant");
    assert_eq!(counters.freeze_tokens_available, 5);

    // Calling again in the same week grants nothing extra
    let again = services.freeze.grant_if_eligible(&user.id).await.expect("grant");
    assert_eq!(again.freeze_tokens_available, 5);

    let conn = services.db.get_connection().expect("connection");
    let tokens: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM freeze_tokens WHERE status = 'available'",
            [],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(tokens, 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_binary_checkins_store_one_row() {
    let (services, _temp_dir) = services();
    let now = Utc::now();

    let user = services.users.ensure_user("user-1", None, Some("UTC")).await.expect("user");
    let habit = services.habits.create_habit(&user, binary_daily_draft()).await.expect("habit");

    let first = services
        .records
        .create_checkin(
            &user,
            &habit,
            CheckinInput { occurred_at: Some(now), ..Default::default() },
        )
        .await
        .expect("first");
    let second = services
        .records
        .create_checkin(
            &user,
            &habit,
            CheckinInput { occurred_at: Some(now), ..Default::default() },
        )
        .await
        .expect("second");

    assert_eq!(first.id, second.id);

    let conn = services.db.get_connection().expect("connection");
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM checkins", [], |row| row.get(0)).expect("count");
    assert_eq!(count, 1);
}

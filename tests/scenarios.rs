//! Integration tests for the testable properties enumerated alongside the
//! component design (S1-S6): backward planning, deep-work session scoring,
//! the chapter-completion revision chain, double-start rejection, quiet-hour
//! rescheduling, and reschedule-all's selective clearing.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqlitePoolOptions;

use study_timeline_engine::models::{
    NotificationPreference, NotificationType, SubjectType, TaskStatus, TaskType,
};
use study_timeline_engine::notification_engine::NotificationEngine;
use study_timeline_engine::{Config, Core, Store};

const USER_ID: i64 = 1;

/// A single-connection in-memory pool with migrations applied. `max_connections(1)`
/// matters here: a pooled in-memory sqlite database is private to the
/// connection that created it, so a pool willing to open a second connection
/// would silently hand back an empty database on the next query.
async fn test_store() -> Store {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    sqlx::migrate!("src/db/migrations").run(&pool).await.expect("run migrations");
    study_timeline_engine::db::connection::ensure_singletons(&pool)
        .await
        .expect("seed singletons");
    Store::new(pool)
}

fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, mi, 0).unwrap()
}

/// S1: a 10-hour backward plan over a 4-day window ramps up toward the
/// deadline and sums exactly to the requested total.
#[test]
fn s1_backward_plan_for_exam() {
    let core = Core::new(Store::new(unconnected_pool()), Config::default());
    let now = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(); // Monday
    let deadline = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap(); // Friday
    let plan = core.planner_backward(now, deadline, 10.0).unwrap();

    assert_eq!(plan.daily_allocations_mins.len(), 4);
    assert_eq!(plan.daily_allocations_mins.iter().sum::<i64>(), 600);
    assert!(plan.daily_allocations_mins[3] > plan.daily_allocations_mins[0]);
}

fn unconnected_pool() -> sqlx::Pool<sqlx::Sqlite> {
    sqlx::Pool::<sqlx::Sqlite>::connect_lazy("sqlite::memory:").expect("lazy pool construction")
}

/// S2: a 5400-second timer session is flagged deep-work, earns 9 points, and
/// rolls into the day's stats and the streak.
#[tokio::test]
async fn s2_timer_deep_work_session() {
    let store = test_store().await;
    let core = Core::new(store.clone(), Config::default());

    store
        .create_subject(USER_ID, "MATH101", "Calculus", 4, SubjectType::ConceptHeavy, None)
        .await
        .unwrap();

    let t0 = dt(2026, 2, 2, 9, 0);
    core.timer_start(Some("MATH101"), None, None, t0).await.unwrap();
    let stopped = core.timer_stop(t0 + chrono::Duration::seconds(5400)).await.unwrap();

    assert!(stopped.is_deep_work);
    assert_eq!(stopped.points_earned, 9);

    let stats = store.daily_study_stats(t0.date()).await.unwrap();
    assert_eq!(stats.study_seconds, 5400);
    assert_eq!(stats.deep_work_seconds, 5400);

    let streak = store.user_streak().await.unwrap();
    assert_eq!(streak.current_streak, 1);
}

/// S3: completing a chapter's reading generates exactly the +7/+14/+21
/// revision chain and flips the assignment into `available`.
#[tokio::test]
async fn s3_chapter_completion_chain() {
    let store = test_store().await;

    let subject = store
        .create_subject(USER_ID, "MATH101", "Calculus", 4, SubjectType::ConceptHeavy, None)
        .await
        .unwrap();
    let chapter = store.create_chapter(subject.id, 3, "Limits").await.unwrap();

    let completed_on = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
    let revisions = store.complete_chapter_reading(chapter.id, completed_on).await.unwrap();

    assert_eq!(revisions.len(), 3);
    assert_eq!(revisions[0].due_date, completed_on + chrono::Duration::days(7));
    assert_eq!(revisions[1].due_date, completed_on + chrono::Duration::days(14));
    assert_eq!(revisions[2].due_date, completed_on + chrono::Duration::days(21));

    let progress = store.get_chapter_progress(chapter.id).await.unwrap();
    assert_eq!(progress.assignment_status, study_timeline_engine::models::AssignmentStatus::Available);
}

/// S4: starting a second timer while one is already running is rejected
/// outright, leaving the running session untouched.
#[tokio::test]
async fn s4_double_start_is_conflict() {
    let store = test_store().await;
    let core = Core::new(store.clone(), Config::default());

    let t0 = dt(2026, 2, 2, 9, 0);
    let first = core.timer_start(Some("MATH101"), None, None, t0).await.unwrap();

    let second = core.timer_start(Some("PHYS101"), None, None, t0 + chrono::Duration::minutes(5)).await;
    assert!(second.is_err());

    let active = store.active_timer().await.unwrap();
    assert_eq!(active.session_id, Some(first.id));
}

/// S5: a reminder generated inside quiet hours is persisted with
/// `scheduled_for` pushed to the end of the quiet window, unsent.
#[tokio::test]
async fn s5_quiet_hours_reschedule_reminder() {
    let store = test_store().await;
    let engine = NotificationEngine::new(store.clone());

    let preference = NotificationPreference {
        quiet_hours_start: Some(chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
        quiet_hours_end: Some(chrono::NaiveTime::from_hms_opt(7, 0, 0).unwrap()),
        ..NotificationPreference::default_for(NotificationType::Reminder)
    };
    store.set_notification_preference(&preference).await.unwrap();

    let task = store
        .create_task(USER_ID, "Read Chapter 3", None, 5, 30, TaskType::Study)
        .await
        .unwrap();
    let start = dt(2026, 2, 2, 22, 45);
    store.place_task(task.id, start, start + chrono::Duration::minutes(30)).await.unwrap();

    let now = dt(2026, 2, 2, 22, 30);
    engine.tick(now).await.unwrap();

    let pending = store.unread_notifications(Some(NotificationType::Reminder)).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].scheduled_for, dt(2026, 2, 3, 7, 0));
    assert!(pending[0].sent_at.is_none());
}

/// S6: reschedule-all clears exactly the still-pending placements in the
/// window and leaves completed tasks untouched.
#[tokio::test]
async fn s6_reschedule_all_spares_completed_tasks() {
    let store = test_store().await;
    let core = Core::new(store.clone(), Config::default());

    let day = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
    let mut pending_ids = Vec::new();
    let mut completed_ids = Vec::new();

    for i in 0..5 {
        let task = store
            .create_task(USER_ID, &format!("Pending task {i}"), None, 5, 30, TaskType::Study)
            .await
            .unwrap();
        let start = day.and_hms_opt(10 + i as u32, 0, 0).unwrap();
        store.place_task(task.id, start, start + chrono::Duration::minutes(30)).await.unwrap();
        pending_ids.push(task.id);
    }

    for i in 0..2 {
        let task = store
            .create_task(USER_ID, &format!("Completed task {i}"), None, 5, 30, TaskType::Study)
            .await
            .unwrap();
        let start = day.and_hms_opt(16 + i as u32, 0, 0).unwrap();
        store.place_task(task.id, start, start + chrono::Duration::minutes(30)).await.unwrap();
        store.update_task_status(task.id, TaskStatus::Completed).await.unwrap();
        completed_ids.push(task.id);
    }

    let window_start = day.and_hms_opt(0, 0, 0).unwrap();
    let window_end = window_start + chrono::Duration::days(1);
    let report = core.tasks_reschedule_all(USER_ID, window_start, window_end).await.unwrap();
    assert_eq!(report.cleared, 5);

    for id in pending_ids {
        let task = store.get_task(id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
    }
    for id in completed_ids {
        let task = store.get_task(id).await.unwrap();
        assert!(task.scheduled_start.is_some());
        assert_eq!(task.status, TaskStatus::Completed);
    }
}

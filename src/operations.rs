//! The external operation surface: the facade any chat/UI/HTTP layer adapts
//! to. `Core` owns the Store, Config, and the shared `NotificationEngine`,
//! and exposes one method per operation.

use std::sync::Arc;

use crate::achievement_evaluator::AchievementEvaluator;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    ActivityType, BreakSession, BreakType, Gap, LearningPattern, Notification, NotificationType,
    PomodoroStatus, Recommendation, Revision, StudySession, SubjectType, Task, TaskStatus, TaskType,
    Timeline, UserAchievement, UserStreak, WellbeingMetric,
};
use crate::notification_engine::NotificationEngine;
use crate::pattern_analyzer::PatternAnalyzer;
use crate::placer::{
    Placement, PlacementFailure, Placer, PendingItem, SubjectAffinity, PRIORITY_ASSIGNMENT,
    PRIORITY_OVERDUE, PRIORITY_REVISION_DUE, PRIORITY_URGENT_LAB,
};
use crate::revision_scheduler::RevisionScheduler;
use crate::store::Store;
use crate::timeline_builder::TimelineBuilder;
use crate::timer::{SessionTimer, TimerStatus};
use crate::wellbeing_monitor::WellbeingMonitor;

/// Minutes assumed for a spaced-repetition review when it enters the pending
/// set, since Revisions carry no `duration_mins` of their own.
const REVISION_REVIEW_MINS: i64 = 30;
/// Minutes assumed for lab-report prep work when it enters the pending set.
const LAB_REPORT_PREP_MINS: i64 = 60;
/// Fallback credit weight when a pending item's subject can't be resolved.
const DEFAULT_SUBJECT_CREDITS: i64 = 3;

/// Tasks, revisions, and lab reports each have independently auto-incrementing
/// row ids, so the pending set namespaces them into disjoint id ranges before
/// handing them to the kind-agnostic [`Placer`], and decodes the range back
/// to a concrete table + id when committing a placement.
const REVISION_ID_OFFSET: i64 = 1_000_000_000;
const LAB_REPORT_ID_OFFSET: i64 = 2_000_000_000;

/// Maps a `PendingItem`'s priority (the Placer's 10-100 scale) down to the
/// `tasks.priority` range (1-10) for the placeholder task a revision or
/// lab-report placement creates.
fn task_priority_for_item(items: &[PendingItem], item_id: i64) -> i64 {
    items
        .iter()
        .find(|item| item.id == item_id)
        .map(|item| (item.priority / 10).clamp(1, 10))
        .unwrap_or(5)
}

pub struct OptimizeReport {
    pub changes_made: usize,
    pub placements: Vec<Placement>,
    pub failures: Vec<PlacementFailure>,
}

pub struct RescheduleReport {
    pub cleared: usize,
    pub placements: Vec<Placement>,
    pub failures: Vec<PlacementFailure>,
}

pub struct BackwardPlan {
    pub daily_allocations_mins: Vec<i64>,
}

pub struct Core {
    store: Store,
    config: Config,
    notifications: Arc<NotificationEngine>,
}

impl Core {
    pub fn new(store: Store, config: Config) -> Self {
        let notifications = Arc::new(NotificationEngine::new(store.clone()));
        Core { store, config, notifications }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn notifications(&self) -> Arc<NotificationEngine> {
        Arc::clone(&self.notifications)
    }

    // -- timeline.* --------------------------------------------------

    pub async fn timeline_get(&self, date: chrono::NaiveDate) -> CoreResult<Timeline> {
        let placed = self.placed_tasks_on(date).await?;
        Ok(TimelineBuilder::new(&self.config).build(date, &placed))
    }

    pub async fn timeline_week(&self, start_date: chrono::NaiveDate) -> CoreResult<Vec<Timeline>> {
        let mut week = Vec::with_capacity(7);
        for offset in 0..7 {
            week.push(self.timeline_get(start_date + chrono::Duration::days(offset)).await?);
        }
        Ok(week)
    }

    async fn placed_tasks_on(&self, date: chrono::NaiveDate) -> CoreResult<Vec<Task>> {
        let mut tasks = Vec::new();
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed] {
            tasks.extend(self.store.tasks_by_date_and_status(date, Some(status)).await?);
        }
        Ok(tasks)
    }

    /// `timeline.optimize(date)`: places the pending set (unplaced tasks,
    /// due revisions, urgent lab prep) into the day's free gaps.
    pub async fn timeline_optimize(&self, user_id: i64, date: chrono::NaiveDate) -> CoreResult<OptimizeReport> {
        let placed = self.placed_tasks_on(date).await?;
        let timeline = TimelineBuilder::new(&self.config).build(date, &placed);
        let gaps: Vec<Gap> = timeline
            .blocks
            .iter()
            .filter(|block| block.activity_type == ActivityType::FreeTime)
            .map(|block| Gap::new(block.start, block.end))
            .collect();

        let items = self.pending_items_for_day(user_id, date).await?;

        let energy = crate::energy::EnergyModel::new(&self.config.energy_curve);
        let placer = Placer::new(&energy, self.config.routine.min_break_after_study);
        let (placements, failures) = placer.place_day(&items, &gaps);

        for placement in &placements {
            self.commit_placement(user_id, placement, &items).await?;
        }

        Ok(OptimizeReport { changes_made: placements.len(), placements, failures })
    }

    /// Writes a committed placement back to its originating table, decoding
    /// the namespaced id range set up by `pending_items_for_day`. Revisions
    /// and lab reports have no `scheduled_start` column of their own, so
    /// each gets a linked placeholder `Task` (created on first placement,
    /// reused after) that the Timeline Builder picks up the same way as any
    /// other task.
    async fn commit_placement(&self, user_id: i64, placement: &Placement, items: &[PendingItem]) -> CoreResult<()> {
        if placement.item_id >= LAB_REPORT_ID_OFFSET {
            let lab_report_id = placement.item_id - LAB_REPORT_ID_OFFSET;
            let report = self.store.get_lab_report(lab_report_id).await?;
            let priority = task_priority_for_item(items, placement.item_id);
            self.store
                .upsert_lab_report_task(
                    user_id,
                    lab_report_id,
                    &report.subject_code,
                    &format!("Lab report prep: {}", report.title),
                    LAB_REPORT_PREP_MINS,
                    priority,
                    placement.start,
                    placement.end,
                )
                .await?;
            return Ok(());
        }
        if placement.item_id >= REVISION_ID_OFFSET {
            let revision_id = placement.item_id - REVISION_ID_OFFSET;
            let revision = self.store.get_revision(revision_id).await?;
            let subject_code = self.store.subject_code_for_chapter(revision.chapter_id).await?;
            let priority = task_priority_for_item(items, placement.item_id);
            self.store
                .upsert_revision_task(
                    user_id,
                    revision_id,
                    &subject_code,
                    &format!("Revision #{}", revision.revision_number),
                    REVISION_REVIEW_MINS,
                    priority,
                    placement.start,
                    placement.end,
                )
                .await?;
            return Ok(());
        }
        self.store.place_task(placement.item_id, placement.start, placement.end).await?;
        Ok(())
    }

    async fn pending_items_for_day(&self, user_id: i64, date: chrono::NaiveDate) -> CoreResult<Vec<PendingItem>> {
        let mut items = Vec::new();

        for task in self.store.unplaced_tasks(user_id).await? {
            let affinity = self.affinity_for_subject(task.subject_code.as_deref()).await?;
            let credits = self.credits_for_subject(task.subject_code.as_deref()).await?;
            items.push(PendingItem {
                id: task.id,
                priority: task.priority * 10,
                subject_credits: credits,
                deadline: None,
                duration_mins: task.duration_mins,
                wants_deep_work: task.is_deep_work || task.task_type == TaskType::Study,
                affinity,
            });
        }

        for revision in self.store.pending_revisions(date).await? {
            let credits = self
                .store
                .subject_credits_for_chapter(revision.chapter_id)
                .await
                .unwrap_or(DEFAULT_SUBJECT_CREDITS);
            let priority = if revision.due_date < date { PRIORITY_OVERDUE } else { PRIORITY_REVISION_DUE };
            items.push(PendingItem {
                id: REVISION_ID_OFFSET + revision.id,
                priority,
                subject_credits: credits,
                deadline: Some(revision.due_date.and_hms_opt(23, 59, 0).unwrap()),
                duration_mins: REVISION_REVIEW_MINS,
                wants_deep_work: false,
                affinity: SubjectAffinity::Neutral,
            });
        }

        for report in self.store.lab_reports_due_within(date, 3).await? {
            let credits = self
                .store
                .get_subject(&report.subject_code)
                .await
                .map(|s| s.credits)
                .unwrap_or(DEFAULT_SUBJECT_CREDITS);
            let hours_left = (report.deadline - date.and_hms_opt(0, 0, 0).unwrap()).num_hours();
            let priority = if hours_left <= 24 { PRIORITY_URGENT_LAB } else { PRIORITY_ASSIGNMENT };
            items.push(PendingItem {
                id: LAB_REPORT_ID_OFFSET + report.id,
                priority,
                subject_credits: credits,
                deadline: Some(report.deadline),
                duration_mins: LAB_REPORT_PREP_MINS,
                wants_deep_work: false,
                affinity: SubjectAffinity::Neutral,
            });
        }

        Ok(items)
    }

    async fn affinity_for_subject(&self, subject_code: Option<&str>) -> CoreResult<SubjectAffinity> {
        let Some(code) = subject_code else { return Ok(SubjectAffinity::Neutral) };
        match self.store.get_subject(code).await {
            Ok(subject) => Ok(match subject.subject_type {
                SubjectType::ConceptHeavy => SubjectAffinity::ConceptHeavy,
                SubjectType::PracticeHeavy => SubjectAffinity::PracticeHeavy,
            }),
            Err(_) => Ok(SubjectAffinity::Neutral),
        }
    }

    async fn credits_for_subject(&self, subject_code: Option<&str>) -> CoreResult<i64> {
        let Some(code) = subject_code else { return Ok(DEFAULT_SUBJECT_CREDITS) };
        Ok(self.store.get_subject(code).await.map(|s| s.credits).unwrap_or(DEFAULT_SUBJECT_CREDITS))
    }

    // -- tasks.* -------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub async fn tasks_create(
        &self,
        user_id: i64,
        title: &str,
        subject_code: Option<&str>,
        priority: i64,
        duration_mins: i64,
        task_type: TaskType,
    ) -> CoreResult<Task> {
        self.store.create_task(user_id, title, subject_code, priority, duration_mins, task_type).await
    }

    pub async fn tasks_update_status(&self, task_id: i64, status: TaskStatus) -> CoreResult<Task> {
        self.store.update_task_status(task_id, status).await
    }

    pub async fn tasks_delete(&self, task_id: i64) -> CoreResult<()> {
        self.store.delete_task(task_id).await
    }

    /// `tasks.place(id, start)`: idempotent when `start` matches the task's
    /// current placement.
    pub async fn tasks_place(&self, task_id: i64, start: chrono::NaiveDateTime) -> CoreResult<Task> {
        let task = self.store.get_task(task_id).await?;
        if task.scheduled_start == Some(start) {
            return Ok(task);
        }
        let end = start + chrono::Duration::minutes(task.duration_mins);
        self.store.place_task(task_id, start, end).await
    }

    /// `tasks.reschedule_all(window, reason)`: clears placement in the
    /// window, then re-runs the priority sweep one day at a time.
    pub async fn tasks_reschedule_all(
        &self,
        user_id: i64,
        window_start: chrono::NaiveDateTime,
        window_end: chrono::NaiveDateTime,
    ) -> CoreResult<RescheduleReport> {
        let cleared = self.store.clear_placements_in_window(user_id, window_start, window_end).await?;

        let mut placements = Vec::new();
        let mut failures = Vec::new();
        let mut date = window_start.date();
        while date < window_end.date() {
            let report = self.timeline_optimize(user_id, date).await?;
            placements.extend(report.placements);
            failures.extend(report.failures);
            date += chrono::Duration::days(1);
        }

        Ok(RescheduleReport { cleared: cleared.len(), placements, failures })
    }

    /// `planner.backward(item, deadline, hours)`: distributes the required
    /// hours across `[now, deadline)` with the linear ramp, without
    /// committing any placement -- callers feed the result into
    /// `timeline_optimize` or their own scheduling loop.
    pub fn planner_backward(
        &self,
        now: chrono::NaiveDate,
        deadline: chrono::NaiveDate,
        hours_needed: f64,
    ) -> CoreResult<BackwardPlan> {
        let day_count = (deadline - now).num_days();
        if day_count <= 0 {
            return Err(CoreError::unschedulable("deadline is not after now"));
        }
        Ok(BackwardPlan {
            daily_allocations_mins: crate::placer::backward_plan_allocation_mins(hours_needed, day_count),
        })
    }

    // -- revisions.* -----------------------------------------------------

    pub async fn revisions_schedule(
        &self,
        chapter_id: i64,
        from: chrono::NaiveDate,
        intervals_days: Option<&[i64]>,
    ) -> CoreResult<Vec<Revision>> {
        RevisionScheduler::new(&self.store).schedule_explicit(chapter_id, from, intervals_days).await
    }

    pub async fn revisions_complete(
        &self,
        revision_id: i64,
        subject_credits: i64,
        today: chrono::NaiveDate,
    ) -> CoreResult<(Revision, UserStreak)> {
        RevisionScheduler::new(&self.store).complete(revision_id, subject_credits, today).await
    }

    // -- timer.* -----------------------------------------------------

    pub async fn timer_start(
        &self,
        subject_code: Option<&str>,
        chapter_id: Option<i64>,
        title: Option<&str>,
        now: chrono::NaiveDateTime,
    ) -> CoreResult<StudySession> {
        SessionTimer::new(&self.store).start(subject_code, chapter_id, title, now).await
    }

    pub async fn timer_stop(&self, now: chrono::NaiveDateTime) -> CoreResult<StudySession> {
        SessionTimer::new(&self.store).stop(now).await
    }

    pub async fn timer_status(&self, now: chrono::NaiveDateTime) -> CoreResult<TimerStatus> {
        SessionTimer::new(&self.store).status(now).await
    }

    // -- wellbeing.* -----------------------------------------------------

    pub async fn wellbeing_score(
        &self,
        user_id: i64,
        date: chrono::NaiveDate,
        now: chrono::NaiveDateTime,
    ) -> CoreResult<(WellbeingMetric, Vec<String>)> {
        WellbeingMonitor::new(&self.store).run(user_id, date, now).await
    }

    // -- breaks.* -----------------------------------------------------

    pub async fn breaks_start(
        &self,
        break_type: BreakType,
        started_at: chrono::NaiveDateTime,
        duration_hint_mins: Option<i64>,
    ) -> CoreResult<BreakSession> {
        self.store.start_break(break_type, started_at, duration_hint_mins).await
    }

    pub async fn breaks_end(&self, break_id: i64, ended_at: chrono::NaiveDateTime) -> CoreResult<BreakSession> {
        self.store.end_break(break_id, ended_at).await
    }

    pub async fn pomodoro_status(&self) -> CoreResult<PomodoroStatus> {
        self.store.pomodoro_status().await
    }

    pub async fn pomodoro_advance(&self, now: chrono::NaiveDateTime) -> CoreResult<PomodoroStatus> {
        self.store.advance_pomodoro(now).await
    }

    // -- notifications.* -----------------------------------------------------

    pub async fn notifications_list(&self, notif_type: Option<NotificationType>) -> CoreResult<Vec<Notification>> {
        self.store.unread_notifications(notif_type).await
    }

    pub async fn notifications_mark_read(&self, id: i64, read_at: chrono::NaiveDateTime) -> CoreResult<()> {
        self.store.mark_notification_read(id, read_at).await
    }

    pub async fn notifications_subscribe(
        &self,
        since_id: i64,
    ) -> CoreResult<(Vec<Notification>, tokio::sync::broadcast::Receiver<Notification>)> {
        self.notifications.subscribe(since_id).await
    }

    // -- patterns.* -----------------------------------------------------

    pub async fn patterns_recommend(&self, subject_code: Option<&str>) -> CoreResult<Vec<Recommendation>> {
        PatternAnalyzer::new(&self.store).recommendations(subject_code).await
    }

    pub async fn patterns_record(&self, pattern: &LearningPattern) -> CoreResult<()> {
        PatternAnalyzer::new(&self.store).record_sample(pattern).await
    }

    // -- achievements.* -----------------------------------------------------

    pub async fn achievements_check(&self, user_id: i64, now: chrono::NaiveDateTime) -> CoreResult<Vec<UserAchievement>> {
        AchievementEvaluator::new(&self.store).evaluate_all(user_id, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_plan_rejects_non_positive_window() {
        let store = Store::new(unreachable_pool());
        let core = Core::new(store, Config::default());
        let now = chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let result = core.planner_backward(now, now, 5.0);
        assert!(result.is_err());
    }

    /// A pool that is never queried -- `planner_backward` is pure and never
    /// touches the store, so this only needs to type-check.
    fn unreachable_pool() -> sqlx::Pool<sqlx::Sqlite> {
        sqlx::Pool::<sqlx::Sqlite>::connect_lazy("sqlite::memory:").expect("lazy pool construction")
    }
}

//! The Notification Engine (C10): periodic scan plus on-demand triggers,
//! fanned out to live subscribers over a broadcast channel with
//! cursor-replay for reconnects.

use tokio::sync::broadcast;

use crate::error::CoreResult;
use crate::models::{Notification, NotificationPriority, NotificationType, TaskStatus};
use crate::pattern_analyzer::PatternAnalyzer;
use crate::store::Store;

const CHANNEL_CAPACITY: usize = 256;
const SCAN_WINDOW_MINS: i64 = 15;
const DEEP_WORK_BREAK_SUGGESTION_MINS: i64 = 90;
const LAB_REPORT_LOOKAHEAD_DAYS: i64 = 3;
const LONG_STUDY_DAY_SECONDS: i64 = 8 * 3600;

/// Owns its `Store` handle (a cheap pool clone) rather than borrowing one,
/// so it can live inside an `Arc` and be shared across the background loop
/// and every live subscriber for the process lifetime.
pub struct NotificationEngine {
    store: Store,
    sender: broadcast::Sender<Notification>,
}

impl NotificationEngine {
    pub fn new(store: Store) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        NotificationEngine { store, sender }
    }

    /// Replays everything created after `since_id`, then returns a live
    /// receiver for subsequent deliveries. A notification created between
    /// the replay query and the subscribe call could in principle appear in
    /// both; callers are expected to de-duplicate by id, matching the
    /// at-least-once contract implied by "re-delivery is the subscriber's
    /// responsibility".
    pub async fn subscribe(&self, since_id: i64) -> CoreResult<(Vec<Notification>, broadcast::Receiver<Notification>)> {
        let backlog = self.store.notifications_since(since_id).await?;
        Ok((backlog, self.sender.subscribe()))
    }

    fn next_instant_outside_quiet_hours(quiet_end: chrono::NaiveTime, now: chrono::NaiveDateTime) -> chrono::NaiveDateTime {
        let candidate = now.date().and_time(quiet_end);
        if candidate > now {
            candidate
        } else {
            (now.date() + chrono::Duration::days(1)).and_time(quiet_end)
        }
    }

    /// Applies the delivery contract: preference gate, quiet-hours
    /// rescheduling, and the rolling frequency limit. Returns `None` when the
    /// notification was dropped outright.
    async fn deliver(
        &self,
        notif_type: NotificationType,
        priority: NotificationPriority,
        title: &str,
        body: &str,
        now: chrono::NaiveDateTime,
    ) -> CoreResult<Option<Notification>> {
        let preference = self.store.notification_preference(notif_type).await?;
        if !preference.enabled {
            return Ok(None);
        }

        let sent_recently = self.store.notifications_sent_in_last_hour(notif_type, now).await?;
        if sent_recently >= preference.frequency_limit {
            return Ok(None);
        }

        let scheduled_for = if preference.is_quiet_at(now.time()) {
            match preference.quiet_hours_end {
                Some(end) => Self::next_instant_outside_quiet_hours(end, now),
                None => now,
            }
        } else {
            now
        };

        let notification = self
            .store
            .create_notification(notif_type, priority, title, body, now, scheduled_for)
            .await?;

        if scheduled_for <= now {
            self.store.mark_notification_sent(notification.id, now).await?;
            let _ = self.sender.send(notification.clone());
        }

        Ok(Some(notification))
    }

    /// Step 1: reminders for tasks starting within the scan window.
    async fn scan_upcoming_tasks(&self, today: chrono::NaiveDate, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let tasks = self.store.tasks_by_date_and_status(today, Some(TaskStatus::Pending)).await?;
        for task in tasks {
            let Some(start) = task.scheduled_start else { continue };
            let minutes_until = (start - now).num_minutes();
            if (0..=SCAN_WINDOW_MINS).contains(&minutes_until) {
                self.deliver(
                    NotificationType::Reminder,
                    NotificationPriority::Normal,
                    "Upcoming task",
                    &format!("\"{}\" starts in {minutes_until} minutes", task.title),
                    now,
                )
                .await?;
            }
        }
        Ok(())
    }

    /// Step 2: break suggestion once the active timer has run long.
    async fn scan_active_timer(&self, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let active = self.store.active_timer().await?;
        let Some(session_id) = active.session_id else { return Ok(()) };
        let session = self.store.get_session(session_id).await?;
        let elapsed_mins = (now - session.started_at).num_minutes();
        if elapsed_mins >= DEEP_WORK_BREAK_SUGGESTION_MINS {
            self.deliver(
                NotificationType::Suggestion,
                NotificationPriority::Normal,
                "Time for a break",
                "You've been focused for over 90 minutes -- a short break will help.",
                now,
            )
            .await?;
        }
        Ok(())
    }

    /// Step 3: revisions due today, not yet completed.
    async fn scan_due_revisions(&self, today: chrono::NaiveDate, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let pending = self.store.pending_revisions(today).await?;
        for revision in pending.iter().filter(|r| r.due_date == today) {
            self.deliver(
                NotificationType::Reminder,
                NotificationPriority::Normal,
                "Revision due today",
                &format!("Revision #{} is due today", revision.revision_number),
                now,
            )
            .await?;
        }
        Ok(())
    }

    /// Step 4: lab reports approaching their deadline, escalated to `high`
    /// priority inside the final 24 hours.
    async fn scan_lab_report_deadlines(&self, today: chrono::NaiveDate, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let due_soon = self.store.lab_reports_due_within(today, LAB_REPORT_LOOKAHEAD_DAYS).await?;
        for report in due_soon {
            let hours_left = (report.deadline - now).num_hours();
            let priority = if hours_left <= 24 { NotificationPriority::High } else { NotificationPriority::Normal };
            self.deliver(
                NotificationType::Deadline,
                priority,
                "Lab report deadline approaching",
                &format!("\"{}\" is due {}", report.title, report.due_date),
                now,
            )
            .await?;
        }
        Ok(())
    }

    /// Step 5: long study day warning.
    async fn scan_long_study_day(&self, today: chrono::NaiveDate, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let stats = self.store.daily_study_stats(today).await?;
        if stats.study_seconds > LONG_STUDY_DAY_SECONDS {
            self.deliver(
                NotificationType::Warning,
                NotificationPriority::Normal,
                "Long study day",
                "You've studied more than 8 hours today.",
                now,
            )
            .await?;
        }
        Ok(())
    }

    /// Step 6: pattern-based suggestions, sourced from C8.
    async fn scan_pattern_suggestions(&self, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let analyzer = PatternAnalyzer::new(&self.store);
        for recommendation in analyzer.recommendations(None).await? {
            self.deliver(
                NotificationType::Suggestion,
                NotificationPriority::Low,
                "Study pattern suggestion",
                &recommendation.rationale,
                now,
            )
            .await?;
        }
        Ok(())
    }

    /// Step 7: flushes achievements C11 marked complete but not yet notified.
    async fn flush_achievements(&self, now: chrono::NaiveDateTime) -> CoreResult<()> {
        for achievement in self.store.unnotified_achievements().await? {
            self.deliver(
                NotificationType::Achievement,
                NotificationPriority::Normal,
                "Achievement unlocked",
                &format!("You've earned \"{}\"", achievement.achievement_code),
                now,
            )
            .await?;
            self.store.mark_achievement_notified(&achievement.achievement_code).await?;
        }
        Ok(())
    }

    /// Runs the full seven-step scan once. Callers (`background.rs`) drive
    /// this on a 15-minute tick.
    pub async fn tick(&self, now: chrono::NaiveDateTime) -> CoreResult<()> {
        let today = now.date();
        self.scan_upcoming_tasks(today, now).await?;
        self.scan_active_timer(now).await?;
        self.scan_due_revisions(today, now).await?;
        self.scan_lab_report_deadlines(today, now).await?;
        self.scan_long_study_day(today, now).await?;
        self.scan_pattern_suggestions(now).await?;
        self.flush_achievements(now).await?;
        Ok(())
    }
}

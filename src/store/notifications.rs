use crate::error::CoreResult;
use crate::models::{Notification, NotificationPreference, NotificationPriority, NotificationType};

use super::Store;

impl Store {
    #[allow(clippy::too_many_arguments)]
    pub async fn create_notification(
        &self,
        notif_type: NotificationType,
        priority: NotificationPriority,
        title: &str,
        body: &str,
        created_at: chrono::NaiveDateTime,
        scheduled_for: chrono::NaiveDateTime,
    ) -> CoreResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (notif_type, priority, title, body, created_at, scheduled_for)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(notif_type)
        .bind(priority)
        .bind(title)
        .bind(body)
        .bind(created_at)
        .bind(scheduled_for)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn mark_notification_sent(&self, id: i64, sent_at: chrono::NaiveDateTime) -> CoreResult<()> {
        sqlx::query("UPDATE notifications SET sent_at = ? WHERE id = ?")
            .bind(sent_at)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn mark_notification_read(&self, id: i64, read_at: chrono::NaiveDateTime) -> CoreResult<()> {
        sqlx::query("UPDATE notifications SET read_at = ? WHERE id = ?")
            .bind(read_at)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn unread_notifications(&self, notif_type: Option<NotificationType>) -> CoreResult<Vec<Notification>> {
        match notif_type {
            Some(notif_type) => sqlx::query_as::<_, Notification>(
                "SELECT * FROM notifications WHERE read_at IS NULL AND notif_type = ? ORDER BY created_at",
            )
            .bind(notif_type)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into),
            None => sqlx::query_as::<_, Notification>(
                "SELECT * FROM notifications WHERE read_at IS NULL ORDER BY created_at",
            )
            .fetch_all(self.pool())
            .await
            .map_err(Into::into),
        }
    }

    /// Notifications created after `since_id`, for the `subscribe(since_id)`
    /// cursor-replay pattern.
    pub async fn notifications_since(&self, since_id: i64) -> CoreResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id > ? ORDER BY id")
            .bind(since_id)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Count of sends for a type within the trailing hour, for the
    /// `frequency_limit` delivery check.
    pub async fn notifications_sent_in_last_hour(
        &self,
        notif_type: NotificationType,
        now: chrono::NaiveDateTime,
    ) -> CoreResult<i64> {
        let since = now - chrono::Duration::hours(1);
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE notif_type = ? AND sent_at >= ? AND sent_at <= ?",
        )
        .bind(notif_type)
        .bind(since)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn notification_preference(&self, notif_type: NotificationType) -> CoreResult<NotificationPreference> {
        sqlx::query_as::<_, NotificationPreference>(
            "SELECT * FROM notification_preferences WHERE notif_type = ?",
        )
        .bind(notif_type)
        .fetch_optional(self.pool())
        .await?
        .map(Ok)
        .unwrap_or_else(|| Ok(NotificationPreference::default_for(notif_type)))
    }

    pub async fn set_notification_preference(&self, preference: &NotificationPreference) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO notification_preferences
                (notif_type, enabled, quiet_hours_start, quiet_hours_end, frequency_limit, channels_json)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(notif_type) DO UPDATE SET
                enabled = excluded.enabled,
                quiet_hours_start = excluded.quiet_hours_start,
                quiet_hours_end = excluded.quiet_hours_end,
                frequency_limit = excluded.frequency_limit,
                channels_json = excluded.channels_json",
        )
        .bind(preference.notif_type)
        .bind(preference.enabled)
        .bind(preference.quiet_hours_start)
        .bind(preference.quiet_hours_end)
        .bind(preference.frequency_limit)
        .bind(&preference.channels_json)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Reminder,
    Achievement,
    Suggestion,
    Warning,
    Deadline,
    Break,
    Motivation,
}

sqlite_str_enum!(NotificationType {
    Reminder => "reminder",
    Achievement => "achievement",
    Suggestion => "suggestion",
    Warning => "warning",
    Deadline => "deadline",
    Break => "break",
    Motivation => "motivation",
});

impl NotificationType {
    pub fn all() -> [NotificationType; 7] {
        [
            NotificationType::Reminder,
            NotificationType::Achievement,
            NotificationType::Suggestion,
            NotificationType::Warning,
            NotificationType::Deadline,
            NotificationType::Break,
            NotificationType::Motivation,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Urgent,
}

sqlite_str_enum!(NotificationPriority {
    Low => "low",
    Normal => "normal",
    High => "high",
    Urgent => "urgent",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: i64,
    pub notif_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub body: String,
    pub created_at: chrono::NaiveDateTime,
    pub scheduled_for: chrono::NaiveDateTime,
    pub sent_at: Option<chrono::NaiveDateTime>,
    pub read_at: Option<chrono::NaiveDateTime>,
    pub dismissed_at: Option<chrono::NaiveDateTime>,
    pub expires_at: Option<chrono::NaiveDateTime>,
    pub action_url: Option<String>,
    pub action_label: Option<String>,
    pub data_json: Option<String>,
}

impl Notification {
    /// `created <= scheduled_for <= sent_at <= read_at <= dismissed_at`
    /// (each comparison only applies when both sides are defined).
    pub fn ordering_is_consistent(&self) -> bool {
        let mut timestamps = vec![self.created_at, self.scheduled_for];
        timestamps.extend(self.sent_at);
        timestamps.extend(self.read_at);
        timestamps.extend(self.dismissed_at);
        timestamps.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct NotificationPreference {
    pub notif_type: NotificationType,
    pub enabled: bool,
    pub quiet_hours_start: Option<chrono::NaiveTime>,
    pub quiet_hours_end: Option<chrono::NaiveTime>,
    pub frequency_limit: i64,
    pub channels_json: String,
}

impl NotificationPreference {
    pub fn default_for(notif_type: NotificationType) -> Self {
        NotificationPreference {
            notif_type,
            enabled: true,
            quiet_hours_start: None,
            quiet_hours_end: None,
            frequency_limit: 10,
            channels_json: "[\"in_app\"]".to_string(),
        }
    }

    /// Whether `at` falls inside the configured quiet-hours window. Handles
    /// windows that wrap past midnight (e.g. 22:00-07:00).
    pub fn is_quiet_at(&self, at: chrono::NaiveTime) -> bool {
        match (self.quiet_hours_start, self.quiet_hours_end) {
            (Some(start), Some(end)) if start <= end => at >= start && at < end,
            (Some(start), Some(end)) => at >= start || at < end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn quiet_hours_wrap_past_midnight() {
        let pref = NotificationPreference {
            quiet_hours_start: Some(NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
            quiet_hours_end: Some(NaiveTime::from_hms_opt(7, 0, 0).unwrap()),
            ..NotificationPreference::default_for(NotificationType::Reminder)
        };
        assert!(pref.is_quiet_at(NaiveTime::from_hms_opt(22, 30, 0).unwrap()));
        assert!(pref.is_quiet_at(NaiveTime::from_hms_opt(2, 0, 0).unwrap()));
        assert!(!pref.is_quiet_at(NaiveTime::from_hms_opt(7, 0, 0).unwrap()));
        assert!(!pref.is_quiet_at(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
    }
}

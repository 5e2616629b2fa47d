use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

sqlite_str_enum!(TaskStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Study,
    Revision,
    Practice,
    Assignment,
    LabWork,
    Break,
    FreeTime,
}

sqlite_str_enum!(TaskType {
    Study => "study",
    Revision => "revision",
    Practice => "practice",
    Assignment => "assignment",
    LabWork => "lab_work",
    Break => "break",
    FreeTime => "free_time",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub subject_code: Option<String>,
    pub priority: i64,
    pub duration_mins: i64,
    pub scheduled_start: Option<chrono::NaiveDateTime>,
    pub scheduled_end: Option<chrono::NaiveDateTime>,
    pub status: TaskStatus,
    pub is_deep_work: bool,
    pub task_type: TaskType,
    pub revision_id: Option<i64>,
    pub lab_report_id: Option<i64>,
    pub created_at: chrono::NaiveDateTime,
}

impl Task {
    /// `scheduled_end - scheduled_start = duration_mins` whenever placed.
    pub fn placement_is_consistent(&self) -> bool {
        match (self.scheduled_start, self.scheduled_end) {
            (Some(start), Some(end)) => {
                (end - start).num_minutes() == self.duration_mins
            }
            (None, None) => true,
            _ => false,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.scheduled_start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(start: chrono::NaiveDateTime, mins: i64) -> Task {
        Task {
            id: 1,
            user_id: 1,
            title: "t".into(),
            subject_code: None,
            priority: 5,
            duration_mins: mins,
            scheduled_start: Some(start),
            scheduled_end: Some(start + chrono::Duration::minutes(mins)),
            status: TaskStatus::Pending,
            is_deep_work: false,
            task_type: TaskType::Study,
            revision_id: None,
            lab_report_id: None,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn placement_consistency_holds_for_matching_duration() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert!(sample(start, 60).placement_is_consistent());
    }

    #[test]
    fn placement_consistency_fails_for_mismatched_duration() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut t = sample(start, 60);
        t.scheduled_end = Some(start + chrono::Duration::minutes(45));
        assert!(!t.placement_is_consistent());
    }
}

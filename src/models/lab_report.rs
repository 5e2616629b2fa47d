use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabReportStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

sqlite_str_enum!(LabReportStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Soon,
    Urgent,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LabReport {
    pub id: i64,
    pub subject_code: String,
    pub title: String,
    pub due_date: chrono::NaiveDate,
    pub deadline: chrono::NaiveDateTime,
    pub status: LabReportStatus,
}

impl LabReport {
    /// `days_left <= 1 -> urgent`, `<= 3 -> soon`, else `normal`.
    pub fn urgency(&self, today: chrono::NaiveDate) -> Urgency {
        let days_left = (self.due_date - today).num_days();
        if days_left <= 1 {
            Urgency::Urgent
        } else if days_left <= 3 {
            Urgency::Soon
        } else {
            Urgency::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report(due_in_days: i64) -> LabReport {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        LabReport {
            id: 1,
            subject_code: "CSE101".into(),
            title: "Report".into(),
            due_date: today + chrono::Duration::days(due_in_days),
            deadline: (today + chrono::Duration::days(due_in_days)).and_hms_opt(23, 59, 0).unwrap(),
            status: LabReportStatus::Pending,
        }
    }

    #[test]
    fn urgency_buckets_match_spec_thresholds() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(report(0).urgency(today), Urgency::Urgent);
        assert_eq!(report(1).urgency(today), Urgency::Urgent);
        assert_eq!(report(3).urgency(today), Urgency::Soon);
        assert_eq!(report(4).urgency(today), Urgency::Normal);
    }
}

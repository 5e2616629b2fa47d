use crate::error::CoreResult;
use crate::models::{LabReport, LabReportStatus};

use super::Store;

impl Store {
    pub async fn create_lab_report(
        &self,
        subject_code: &str,
        title: &str,
        due_date: chrono::NaiveDate,
        deadline: chrono::NaiveDateTime,
    ) -> CoreResult<LabReport> {
        sqlx::query_as::<_, LabReport>(
            "INSERT INTO lab_reports (subject_code, title, due_date, deadline)
             VALUES (?, ?, ?, ?)
             RETURNING *",
        )
        .bind(subject_code)
        .bind(title)
        .bind(due_date)
        .bind(deadline)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn get_lab_report(&self, report_id: i64) -> CoreResult<LabReport> {
        sqlx::query_as::<_, LabReport>("SELECT * FROM lab_reports WHERE id = ?")
            .bind(report_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn update_lab_report_status(
        &self,
        report_id: i64,
        status: LabReportStatus,
    ) -> CoreResult<LabReport> {
        sqlx::query_as::<_, LabReport>("UPDATE lab_reports SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(report_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Deadlines within `days` of `today`, across both tasks-bearing
    /// deadlines and lab reports in the Placer's pending set.
    pub async fn lab_reports_due_within(
        &self,
        today: chrono::NaiveDate,
        days: i64,
    ) -> CoreResult<Vec<LabReport>> {
        let cutoff = today + chrono::Duration::days(days);
        sqlx::query_as::<_, LabReport>(
            "SELECT * FROM lab_reports
             WHERE due_date <= ? AND status NOT IN ('completed', 'cancelled')
             ORDER BY due_date",
        )
        .bind(cutoff)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }
}

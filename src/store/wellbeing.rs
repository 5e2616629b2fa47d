use crate::error::{CoreError, CoreResult};
use crate::models::{BreakSession, BreakType, PomodoroStatus, WellbeingMetric};

use super::Store;

impl Store {
    pub async fn start_break(
        &self,
        break_type: BreakType,
        started_at: chrono::NaiveDateTime,
        duration_hint_mins: Option<i64>,
    ) -> CoreResult<BreakSession> {
        let suggested = duration_hint_mins.unwrap_or_else(|| break_type.default_duration_mins());
        sqlx::query_as::<_, BreakSession>(
            "INSERT INTO break_sessions (break_type, started_at, suggested_duration_mins)
             VALUES (?, ?, ?)
             RETURNING *",
        )
        .bind(break_type)
        .bind(started_at)
        .bind(suggested)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    /// `breaks.end`: `was_completed :=
    /// actual_duration_mins >= 0.7 * suggested_duration_mins`.
    pub async fn end_break(&self, break_id: i64, ended_at: chrono::NaiveDateTime) -> CoreResult<BreakSession> {
        let mut tx = self.pool().begin().await?;

        let session = sqlx::query_as::<_, BreakSession>("SELECT * FROM break_sessions WHERE id = ?")
            .bind(break_id)
            .fetch_one(&mut *tx)
            .await?;

        if session.ended_at.is_some() {
            return Err(CoreError::conflict("break already ended"));
        }

        let actual_mins = (ended_at - session.started_at).num_minutes().max(0);
        let was_completed =
            actual_mins as f64 >= BreakSession::completion_ratio_threshold() * session.suggested_duration_mins as f64;

        let updated = sqlx::query_as::<_, BreakSession>(
            "UPDATE break_sessions
             SET ended_at = ?, actual_duration_mins = ?, was_completed = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(ended_at)
        .bind(actual_mins)
        .bind(was_completed)
        .bind(break_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn break_count_on(&self, date: chrono::NaiveDate) -> CoreResult<i64> {
        let start = date.and_hms_opt(0, 0, 0).unwrap();
        let end = start + chrono::Duration::days(1);
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM break_sessions WHERE started_at >= ? AND started_at < ? AND was_completed = 1",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    /// Count of breaks started on `date` that ended without reaching the
    /// completion threshold, for the Wellbeing Monitor's "don't skip your
    /// next break" recommendation.
    pub async fn skipped_break_count_on(&self, date: chrono::NaiveDate) -> CoreResult<i64> {
        let start = date.and_hms_opt(0, 0, 0).unwrap();
        let end = start + chrono::Duration::days(1);
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM break_sessions
             WHERE started_at >= ? AND started_at < ? AND ended_at IS NOT NULL AND was_completed = 0",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn pomodoro_status(&self) -> CoreResult<PomodoroStatus> {
        sqlx::query_as::<_, PomodoroStatus>(
            "SELECT current_phase, cycles_completed, phase_started_at FROM pomodoro_status",
        )
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn advance_pomodoro(&self, now: chrono::NaiveDateTime) -> CoreResult<PomodoroStatus> {
        let current = self.pomodoro_status().await?;
        let next = current.advance(now);
        sqlx::query(
            "UPDATE pomodoro_status SET current_phase = ?, cycles_completed = ?, phase_started_at = ?",
        )
        .bind(next.current_phase)
        .bind(next.cycles_completed)
        .bind(next.phase_started_at)
        .execute(self.pool())
        .await?;
        Ok(next)
    }

    pub async fn upsert_wellbeing_metric(&self, metric: &WellbeingMetric) -> CoreResult<WellbeingMetric> {
        sqlx::query_as::<_, WellbeingMetric>(
            "INSERT INTO wellbeing_metrics
                (metric_date, study_hours, break_count, overdue_tasks, deep_work_sessions, wellbeing_score, recommendations_json)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(metric_date) DO UPDATE SET
                study_hours = excluded.study_hours,
                break_count = excluded.break_count,
                overdue_tasks = excluded.overdue_tasks,
                deep_work_sessions = excluded.deep_work_sessions,
                wellbeing_score = excluded.wellbeing_score,
                recommendations_json = excluded.recommendations_json
             RETURNING *",
        )
        .bind(metric.metric_date)
        .bind(metric.study_hours)
        .bind(metric.break_count)
        .bind(metric.overdue_tasks)
        .bind(metric.deep_work_sessions)
        .bind(metric.wellbeing_score)
        .bind(&metric.recommendations_json)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn wellbeing_metric(&self, date: chrono::NaiveDate) -> CoreResult<Option<WellbeingMetric>> {
        sqlx::query_as::<_, WellbeingMetric>("SELECT * FROM wellbeing_metrics WHERE metric_date = ?")
            .bind(date)
            .fetch_optional(self.pool())
            .await
            .map_err(Into::into)
    }
}

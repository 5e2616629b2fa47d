use crate::error::{CoreError, CoreResult};
use crate::models::{
    ActiveTimer, DailyStudyStats, StudySession, DEEP_WORK_THRESHOLD_SECONDS,
    STREAK_MIN_SESSION_SECONDS,
};

use super::Store;

impl Store {
    pub async fn active_timer(&self) -> CoreResult<ActiveTimer> {
        sqlx::query_as::<_, ActiveTimer>("SELECT session_id FROM active_timer")
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// `timer.start`: fails with `Conflict` if a session is already running,
    /// otherwise opens a new one and points the active-timer register at
    /// it, atomically.
    pub async fn start_session(
        &self,
        subject_code: Option<&str>,
        chapter_id: Option<i64>,
        title: Option<&str>,
        started_at: chrono::NaiveDateTime,
    ) -> CoreResult<StudySession> {
        let mut tx = self.pool().begin().await?;

        let active: ActiveTimer = sqlx::query_as("SELECT session_id FROM active_timer")
            .fetch_one(&mut *tx)
            .await?;
        if active.is_running() {
            return Err(CoreError::conflict("a study session is already running"));
        }

        let session = sqlx::query_as::<_, StudySession>(
            "INSERT INTO study_sessions (subject_code, chapter_id, title, started_at)
             VALUES (?, ?, ?, ?)
             RETURNING *",
        )
        .bind(subject_code)
        .bind(chapter_id)
        .bind(title)
        .bind(started_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE active_timer SET session_id = ?")
            .bind(session.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(session)
    }

    /// `timer.stop`: computes `duration_seconds`, `is_deep_work`,
    /// `points_earned`, clears the active-timer register, and rolls the
    /// derived daily-stats row forward -- all in one transaction.
    pub async fn stop_session(&self, now: chrono::NaiveDateTime) -> CoreResult<StudySession> {
        let mut tx = self.pool().begin().await?;

        let active: ActiveTimer = sqlx::query_as("SELECT session_id FROM active_timer")
            .fetch_one(&mut *tx)
            .await?;
        let session_id = active
            .session_id
            .ok_or_else(|| CoreError::precondition("no active study session"))?;

        let session = sqlx::query_as::<_, StudySession>("SELECT * FROM study_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_one(&mut *tx)
            .await?;

        let duration_seconds = (now - session.started_at).num_seconds().max(0);
        let is_deep_work = duration_seconds >= DEEP_WORK_THRESHOLD_SECONDS;
        let points = StudySession::points_for_duration(duration_seconds);

        let stopped = sqlx::query_as::<_, StudySession>(
            "UPDATE study_sessions
             SET stopped_at = ?, duration_seconds = ?, is_deep_work = ?, points_earned = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(now)
        .bind(duration_seconds)
        .bind(is_deep_work)
        .bind(points)
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE active_timer SET session_id = NULL")
            .execute(&mut *tx)
            .await?;

        let study_date = now.date();
        sqlx::query(
            "INSERT INTO daily_study_stats (study_date, study_seconds, deep_work_seconds, sessions, points)
             VALUES (?, ?, ?, 1, ?)
             ON CONFLICT(study_date) DO UPDATE SET
                study_seconds = study_seconds + excluded.study_seconds,
                deep_work_seconds = deep_work_seconds + excluded.deep_work_seconds,
                sessions = sessions + 1,
                points = points + excluded.points",
        )
        .bind(study_date)
        .bind(duration_seconds)
        .bind(if is_deep_work { duration_seconds } else { 0 })
        .bind(points)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE user_streak SET total_points = total_points + ?")
            .bind(points)
            .execute(&mut *tx)
            .await?;

        if duration_seconds >= STREAK_MIN_SESSION_SECONDS {
            self.apply_streak_activity_tx(&mut tx, study_date).await?;
        }

        tx.commit().await?;
        Ok(stopped)
    }

    pub async fn get_session(&self, session_id: i64) -> CoreResult<StudySession> {
        sqlx::query_as::<_, StudySession>("SELECT * FROM study_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn sessions_in_window(
        &self,
        window_start: chrono::NaiveDateTime,
        window_end: chrono::NaiveDateTime,
    ) -> CoreResult<Vec<StudySession>> {
        sqlx::query_as::<_, StudySession>(
            "SELECT * FROM study_sessions WHERE started_at >= ? AND started_at < ? ORDER BY started_at",
        )
        .bind(window_start)
        .bind(window_end)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }

    /// All-time study seconds, for the Achievement Evaluator's `study`
    /// category.
    pub async fn total_study_seconds(&self) -> CoreResult<i64> {
        sqlx::query_scalar("SELECT COALESCE(SUM(study_seconds), 0) FROM daily_study_stats")
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Count of sessions on `date` that crossed the deep-work threshold, used
    /// by the Wellbeing Monitor's `deep_work_sessions` indicator.
    pub async fn deep_work_session_count_on(&self, date: chrono::NaiveDate) -> CoreResult<i64> {
        let start = date.and_hms_opt(0, 0, 0).unwrap();
        let end = start + chrono::Duration::days(1);
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM study_sessions
             WHERE started_at >= ? AND started_at < ? AND is_deep_work = 1",
        )
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn daily_study_stats(&self, date: chrono::NaiveDate) -> CoreResult<DailyStudyStats> {
        sqlx::query_as::<_, DailyStudyStats>("SELECT * FROM daily_study_stats WHERE study_date = ?")
            .bind(date)
            .fetch_optional(self.pool())
            .await?
            .map(Ok)
            .unwrap_or_else(|| {
                Ok(DailyStudyStats {
                    study_date: date,
                    ..Default::default()
                })
            })
    }
}

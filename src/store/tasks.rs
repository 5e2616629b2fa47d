use crate::error::{CoreError, CoreResult};
use crate::models::{Task, TaskStatus, TaskType};

use super::Store;

impl Store {
    #[allow(clippy::too_many_arguments)]
    pub async fn create_task(
        &self,
        user_id: i64,
        title: &str,
        subject_code: Option<&str>,
        priority: i64,
        duration_mins: i64,
        task_type: TaskType,
    ) -> CoreResult<Task> {
        if !(1..=10).contains(&priority) {
            return Err(CoreError::validation("priority must be between 1 and 10"));
        }
        if duration_mins <= 0 {
            return Err(CoreError::validation("duration_mins must be positive"));
        }

        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, title, subject_code, priority, duration_mins, task_type)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(subject_code)
        .bind(priority)
        .bind(duration_mins)
        .bind(task_type)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn get_task(&self, task_id: i64) -> CoreResult<Task> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> CoreResult<Task> {
        sqlx::query_as::<_, Task>("UPDATE tasks SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(task_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn delete_task(&self, task_id: i64) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(format!("task {task_id}")));
        }
        Ok(())
    }

    /// Finds (or creates) the placeholder `Task` linked to a revision review
    /// slot, then places it -- this is how a revision's pending-set entry
    /// ends up as a real block the Timeline Builder can read back via
    /// `tasks_by_date_and_status`.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_revision_task(
        &self,
        user_id: i64,
        revision_id: i64,
        subject_code: &str,
        title: &str,
        duration_mins: i64,
        priority: i64,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    ) -> CoreResult<Task> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM tasks WHERE revision_id = ?")
            .bind(revision_id)
            .fetch_optional(self.pool())
            .await?;

        let task_id = match existing {
            Some(id) => id,
            None => {
                sqlx::query_scalar(
                    "INSERT INTO tasks (user_id, title, subject_code, priority, duration_mins, task_type, revision_id)
                     VALUES (?, ?, ?, ?, ?, 'revision', ?)
                     RETURNING id",
                )
                .bind(user_id)
                .bind(title)
                .bind(subject_code)
                .bind(priority)
                .bind(duration_mins)
                .bind(revision_id)
                .fetch_one(self.pool())
                .await?
            }
        };

        self.place_task(task_id, start, end).await
    }

    /// Same as [`Store::upsert_revision_task`] for a lab-report prep slot.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_lab_report_task(
        &self,
        user_id: i64,
        lab_report_id: i64,
        subject_code: &str,
        title: &str,
        duration_mins: i64,
        priority: i64,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    ) -> CoreResult<Task> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM tasks WHERE lab_report_id = ?")
            .bind(lab_report_id)
            .fetch_optional(self.pool())
            .await?;

        let task_id = match existing {
            Some(id) => id,
            None => {
                sqlx::query_scalar(
                    "INSERT INTO tasks (user_id, title, subject_code, priority, duration_mins, task_type, lab_report_id)
                     VALUES (?, ?, ?, ?, ?, 'lab_work', ?)
                     RETURNING id",
                )
                .bind(user_id)
                .bind(title)
                .bind(subject_code)
                .bind(priority)
                .bind(duration_mins)
                .bind(lab_report_id)
                .fetch_one(self.pool())
                .await?
            }
        };

        self.place_task(task_id, start, end).await
    }

    /// Commits a single placement atomically: rejects a placement that
    /// overlaps another placed, non-cancelled task for the same user and day
    /// before writing `scheduled_start/end`.
    pub async fn place_task(
        &self,
        task_id: i64,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    ) -> CoreResult<Task> {
        let mut tx = self.pool().begin().await?;

        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_one(&mut *tx)
            .await?;

        let overlap_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks
             WHERE user_id = ? AND id != ? AND status != 'cancelled'
               AND scheduled_start IS NOT NULL
               AND scheduled_start < ? AND scheduled_end > ?",
        )
        .bind(task.user_id)
        .bind(task_id)
        .bind(end)
        .bind(start)
        .fetch_one(&mut *tx)
        .await?;

        if overlap_count > 0 {
            return Err(CoreError::conflict("placement overlaps an existing placed task"));
        }

        let placed = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET scheduled_start = ?, scheduled_end = ?, status = 'pending' WHERE id = ? RETURNING *",
        )
        .bind(start)
        .bind(end)
        .bind(task_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(placed)
    }

    /// Clears placement and resets status to `pending`, used by reschedule-all.
    pub async fn clear_placement(&self, task_id: i64) -> CoreResult<()> {
        sqlx::query(
            "UPDATE tasks SET scheduled_start = NULL, scheduled_end = NULL, status = 'pending' WHERE id = ?",
        )
        .bind(task_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn tasks_by_date_and_status(
        &self,
        date: chrono::NaiveDate,
        status: Option<TaskStatus>,
    ) -> CoreResult<Vec<Task>> {
        let start = date.and_hms_opt(0, 0, 0).unwrap();
        let end = start + chrono::Duration::days(1);
        match status {
            Some(status) => sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks
                 WHERE scheduled_start >= ? AND scheduled_start < ? AND status = ?
                 ORDER BY scheduled_start",
            )
            .bind(start)
            .bind(end)
            .bind(status)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into),
            None => sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks WHERE scheduled_start >= ? AND scheduled_start < ? ORDER BY scheduled_start",
            )
            .bind(start)
            .bind(end)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into),
        }
    }

    /// Excludes revision-review and lab-report-prep placeholder tasks --
    /// those re-enter the pending set through `pending_revisions` /
    /// `lab_reports_due_within` instead, keyed off their own due dates.
    pub async fn unplaced_tasks(&self, user_id: i64) -> CoreResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks
             WHERE user_id = ? AND scheduled_start IS NULL AND status = 'pending'
               AND revision_id IS NULL AND lab_report_id IS NULL",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }

    /// All-time count of completed tasks, for the Achievement Evaluator's
    /// `goal` category.
    pub async fn completed_task_count(&self, user_id: i64) -> CoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = ? AND status = 'completed'")
            .bind(user_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Count of tasks still not completed whose `scheduled_end` has already
    /// passed `as_of`, used by the Wellbeing Monitor's `overdue_factor`.
    pub async fn overdue_task_count(&self, user_id: i64, as_of: chrono::NaiveDateTime) -> CoreResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks
             WHERE user_id = ? AND status NOT IN ('completed', 'cancelled')
               AND scheduled_end IS NOT NULL AND scheduled_end < ?",
        )
        .bind(user_id)
        .bind(as_of)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    /// Clears placement for all non-completed tasks in `[window_start,
    /// window_end)`, for the reschedule-all operation.
    pub async fn clear_placements_in_window(
        &self,
        user_id: i64,
        window_start: chrono::NaiveDateTime,
        window_end: chrono::NaiveDateTime,
    ) -> CoreResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks
             SET scheduled_start = NULL, scheduled_end = NULL, status = 'pending'
             WHERE user_id = ? AND status != 'completed'
               AND scheduled_start >= ? AND scheduled_start < ?
             RETURNING *",
        )
        .bind(user_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }
}

use crate::error::{CoreError, CoreResult};
use crate::models::Revision;

use super::Store;

impl Store {
    pub async fn get_revision(&self, revision_id: i64) -> CoreResult<Revision> {
        sqlx::query_as::<_, Revision>("SELECT * FROM revisions WHERE id = ?")
            .bind(revision_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Replaces the default reading-completion intervals with an explicit
    /// sequence (the `schedule_chapter_revision` tool call), e.g. `[1,3,7,14,30]`.
    pub async fn schedule_chapter_revisions(
        &self,
        chapter_id: i64,
        from: chrono::NaiveDate,
        intervals_days: &[i64],
    ) -> CoreResult<Vec<Revision>> {
        let mut tx = self.pool().begin().await?;
        let mut revisions = Vec::with_capacity(intervals_days.len());
        for (index, offset_days) in intervals_days.iter().enumerate() {
            let due_date = from + chrono::Duration::days(*offset_days);
            let revision = sqlx::query_as::<_, Revision>(
                "INSERT INTO revisions (chapter_id, revision_number, due_date, completed, points_earned)
                 VALUES (?, ?, ?, 0, 0)
                 RETURNING *",
            )
            .bind(chapter_id)
            .bind(index as i64 + 1)
            .bind(due_date)
            .fetch_one(&mut *tx)
            .await?;
            revisions.push(revision);
        }
        tx.commit().await?;
        Ok(revisions)
    }

    /// Atomic "complete revision": awards `5 * credits` points, adds them to
    /// the running total, and rolls the streak forward -- with no duration
    /// guard, unlike session completion.
    pub async fn complete_revision(
        &self,
        revision_id: i64,
        credits: i64,
        today: chrono::NaiveDate,
    ) -> CoreResult<(Revision, crate::models::UserStreak)> {
        let mut tx = self.pool().begin().await?;

        let existing = sqlx::query_as::<_, Revision>("SELECT * FROM revisions WHERE id = ?")
            .bind(revision_id)
            .fetch_one(&mut *tx)
            .await?;

        if existing.completed {
            return Err(CoreError::conflict("revision already completed"));
        }

        let points = crate::models::Revision::points_for_credits(credits);
        let updated = sqlx::query_as::<_, Revision>(
            "UPDATE revisions SET completed = 1, points_earned = ? WHERE id = ? RETURNING *",
        )
        .bind(points)
        .bind(revision_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE user_streak SET total_points = total_points + ?")
            .bind(points)
            .execute(&mut *tx)
            .await?;
        let streak = self.apply_streak_activity_tx(&mut tx, today).await?;

        tx.commit().await?;
        Ok((updated, streak))
    }

    /// All-time count of completed revisions, for the Achievement
    /// Evaluator's `revision` category.
    pub async fn completed_revision_count(&self) -> CoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM revisions WHERE completed = 1")
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Pending revisions ordered by `(due_date, subject.credits desc)`, for
    /// the Placer's pending set and range queries over due work.
    pub async fn pending_revisions(&self, today: chrono::NaiveDate) -> CoreResult<Vec<Revision>> {
        sqlx::query_as::<_, Revision>(
            "SELECT r.* FROM revisions r
             JOIN chapters c ON c.id = r.chapter_id
             JOIN subjects s ON s.id = c.subject_id
             WHERE r.completed = 0 AND r.due_date <= ?
             ORDER BY r.due_date ASC, s.credits DESC",
        )
        .bind(today)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }
}

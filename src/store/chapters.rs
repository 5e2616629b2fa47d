use crate::config::chapter_slug_is_valid;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    AssignmentStatus, Chapter, ChapterProgress, ReadingStatus, Revision,
    DEFAULT_REVISION_INTERVALS_DAYS,
};

use super::Store;

impl Store {
    pub async fn create_chapter(&self, subject_id: i64, number: i64, title: &str) -> CoreResult<Chapter> {
        if number < 1 || number > 99 {
            return Err(CoreError::validation("chapter number must be between 1 and 99"));
        }

        let mut tx = self.pool().begin().await?;
        let chapter = sqlx::query_as::<_, Chapter>(
            "INSERT INTO chapters (subject_id, number, title) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(subject_id)
        .bind(number)
        .bind(title)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO chapter_progress (chapter_id) VALUES (?)")
            .bind(chapter.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(chapter)
    }

    /// Validates a slug of the form `chapterNN` against the naming rule
    /// before any caller-facing create path accepts it.
    pub fn validate_chapter_slug(slug: &str) -> CoreResult<()> {
        if chapter_slug_is_valid(slug) {
            Ok(())
        } else {
            Err(CoreError::validation(format!("invalid chapter slug: {slug}")))
        }
    }

    pub async fn get_chapter_progress(&self, chapter_id: i64) -> CoreResult<ChapterProgress> {
        sqlx::query_as::<_, ChapterProgress>("SELECT * FROM chapter_progress WHERE chapter_id = ?")
            .bind(chapter_id)
            .fetch_one(self.pool())
            .await
            .map_err(Into::into)
    }

    /// Atomic "complete chapter reading": flips
    /// `reading_status -> completed`, `assignment_status -> available`, and
    /// inserts exactly three Revision rows at +7/+14/+21 days, all-or-nothing.
    pub async fn complete_chapter_reading(
        &self,
        chapter_id: i64,
        completed_on: chrono::NaiveDate,
    ) -> CoreResult<Vec<Revision>> {
        let mut tx = self.pool().begin().await?;

        let progress = sqlx::query_as::<_, ChapterProgress>(
            "SELECT * FROM chapter_progress WHERE chapter_id = ?",
        )
        .bind(chapter_id)
        .fetch_one(&mut *tx)
        .await?;

        if progress.reading_status == ReadingStatus::Completed {
            return Err(CoreError::conflict("chapter reading already completed"));
        }

        sqlx::query(
            "UPDATE chapter_progress SET reading_status = ?, assignment_status = ? WHERE chapter_id = ?",
        )
        .bind(ReadingStatus::Completed)
        .bind(AssignmentStatus::Available)
        .bind(chapter_id)
        .execute(&mut *tx)
        .await?;

        let mut revisions = Vec::with_capacity(DEFAULT_REVISION_INTERVALS_DAYS.len());
        for (index, offset_days) in DEFAULT_REVISION_INTERVALS_DAYS.iter().enumerate() {
            let due_date = completed_on + chrono::Duration::days(*offset_days);
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

    pub async fn set_assignment_status(
        &self,
        chapter_id: i64,
        status: AssignmentStatus,
    ) -> CoreResult<()> {
        sqlx::query("UPDATE chapter_progress SET assignment_status = ? WHERE chapter_id = ?")
            .bind(status)
            .bind(chapter_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Looks up the owning subject's credits for a chapter, for the
    /// Placer's tie-break and `match_score` inputs.
    pub async fn subject_credits_for_chapter(&self, chapter_id: i64) -> CoreResult<i64> {
        sqlx::query_scalar(
            "SELECT s.credits FROM subjects s JOIN chapters c ON c.subject_id = s.id WHERE c.id = ?",
        )
        .bind(chapter_id)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    /// Looks up the owning subject's code for a chapter, for building the
    /// placeholder task a revision review slot places into the timeline.
    pub async fn subject_code_for_chapter(&self, chapter_id: i64) -> CoreResult<String> {
        sqlx::query_scalar(
            "SELECT s.code FROM subjects s JOIN chapters c ON c.subject_id = s.id WHERE c.id = ?",
        )
        .bind(chapter_id)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn list_chapters_by_subject(&self, subject_id: i64) -> CoreResult<Vec<Chapter>> {
        sqlx::query_as::<_, Chapter>("SELECT * FROM chapters WHERE subject_id = ? ORDER BY number")
            .bind(subject_id)
            .fetch_all(self.pool())
            .await
            .map_err(Into::into)
    }
}

//! The Revision Scheduler (C6): maintains the per-chapter spaced-repetition
//! queue and applies the points/streak rewards on completion.

use crate::error::CoreResult;
use crate::models::{Revision, UserStreak, EXPLICIT_TOOL_REVISION_INTERVALS_DAYS};
use crate::store::Store;

pub struct RevisionScheduler<'a> {
    store: &'a Store,
}

impl<'a> RevisionScheduler<'a> {
    pub fn new(store: &'a Store) -> Self {
        RevisionScheduler { store }
    }

    /// Chapter-reading completion path: generates the default `[+7,+14,+21]`
    /// revisions. The chapter-completion flip itself is owned by
    /// `Store::complete_chapter_reading`; this just forwards.
    pub async fn on_chapter_completed(
        &self,
        chapter_id: i64,
        completed_on: chrono::NaiveDate,
    ) -> CoreResult<Vec<Revision>> {
        self.store.complete_chapter_reading(chapter_id, completed_on).await
    }

    /// `revisions.schedule(chapter_id, intervals[])`: an explicit interval
    /// override, commonly `[1,3,7,14,30]`, replacing the default.
    pub async fn schedule_explicit(
        &self,
        chapter_id: i64,
        from: chrono::NaiveDate,
        intervals_days: Option<&[i64]>,
    ) -> CoreResult<Vec<Revision>> {
        let intervals = intervals_days.unwrap_or(&EXPLICIT_TOOL_REVISION_INTERVALS_DAYS);
        self.store.schedule_chapter_revisions(chapter_id, from, intervals).await
    }

    /// `revisions.complete(revision_id)`: awards `5 * credits` points and
    /// updates the streak; unlike session completion, there's no duration
    /// guard here.
    pub async fn complete(
        &self,
        revision_id: i64,
        subject_credits: i64,
        today: chrono::NaiveDate,
    ) -> CoreResult<(Revision, UserStreak)> {
        self.store.complete_revision(revision_id, subject_credits, today).await
    }

    pub async fn pending(&self, today: chrono::NaiveDate) -> CoreResult<Vec<Revision>> {
        self.store.pending_revisions(today).await
    }
}

//! The Session Timer (C7): start/stop/status over the ActiveTimer singleton.
//! The atomic transactional work lives in [`crate::store`]; this module
//! adds the derived `status()` read and re-exposes the contract in one place.

use crate::error::CoreResult;
use crate::models::{StudySession, DEEP_WORK_THRESHOLD_SECONDS};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct TimerStatus {
    pub running: bool,
    pub session_id: Option<i64>,
    pub elapsed_seconds: i64,
    pub is_deep_work: bool,
}

pub struct SessionTimer<'a> {
    store: &'a Store,
}

impl<'a> SessionTimer<'a> {
    pub fn new(store: &'a Store) -> Self {
        SessionTimer { store }
    }

    pub async fn start(
        &self,
        subject_code: Option<&str>,
        chapter_id: Option<i64>,
        title: Option<&str>,
        now: chrono::NaiveDateTime,
    ) -> CoreResult<StudySession> {
        self.store.start_session(subject_code, chapter_id, title, now).await
    }

    pub async fn stop(&self, now: chrono::NaiveDateTime) -> CoreResult<StudySession> {
        self.store.stop_session(now).await
    }

    /// `status()`: elapsed seconds derived from `now - started_at`, without
    /// mutating anything.
    pub async fn status(&self, now: chrono::NaiveDateTime) -> CoreResult<TimerStatus> {
        let active = self.store.active_timer().await?;
        let Some(session_id) = active.session_id else {
            return Ok(TimerStatus { running: false, session_id: None, elapsed_seconds: 0, is_deep_work: false });
        };

        let session = self.store.get_session(session_id).await?;
        let elapsed_seconds = (now - session.started_at).num_seconds().max(0);
        Ok(TimerStatus {
            running: true,
            session_id: Some(session_id),
            elapsed_seconds,
            is_deep_work: elapsed_seconds >= DEEP_WORK_THRESHOLD_SECONDS,
        })
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Deep-work threshold used by both the Session Timer and the Wellbeing
/// Monitor.
pub const DEEP_WORK_THRESHOLD_SECONDS: i64 = 5400;

/// Minimum session duration that counts toward the daily streak.
pub const STREAK_MIN_SESSION_SECONDS: i64 = 1800;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct StudySession {
    pub id: i64,
    pub subject_code: Option<String>,
    pub chapter_id: Option<i64>,
    pub title: Option<String>,
    pub started_at: chrono::NaiveDateTime,
    pub stopped_at: Option<chrono::NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    pub is_deep_work: bool,
    pub points_earned: i64,
}

impl StudySession {
    /// `points := min(50, duration_seconds / 600)`.
    pub fn points_for_duration(duration_seconds: i64) -> i64 {
        (duration_seconds / 600).min(50)
    }

    pub fn is_deep_work_for_duration(duration_seconds: i64) -> bool {
        duration_seconds >= DEEP_WORK_THRESHOLD_SECONDS
    }
}

/// The single register cell pointing at the one open `StudySession`, if any.
/// Modeled as a named register, not a table-shaped collection, per the
/// re-architecture notes.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default)]
pub struct ActiveTimer {
    pub session_id: Option<i64>,
}

impl ActiveTimer {
    pub fn is_running(&self) -> bool {
        self.session_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_formula_matches_scenario_s2() {
        assert_eq!(StudySession::points_for_duration(5400), 9);
    }

    #[test]
    fn points_formula_caps_at_fifty() {
        assert_eq!(StudySession::points_for_duration(60 * 600), 50);
    }

    #[test]
    fn deep_work_threshold_is_ninety_minutes() {
        assert!(StudySession::is_deep_work_for_duration(5400));
        assert!(!StudySession::is_deep_work_for_duration(5399));
    }
}

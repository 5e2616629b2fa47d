use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default intervals applied on chapter-reading completion -- distinct from
/// the explicit-tool default below.
pub const DEFAULT_REVISION_INTERVALS_DAYS: [i64; 3] = [7, 14, 21];

/// Default intervals for the explicit `schedule_chapter_revision` tool call.
pub const EXPLICIT_TOOL_REVISION_INTERVALS_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Revision {
    pub id: i64,
    pub chapter_id: i64,
    pub revision_number: i64,
    pub due_date: chrono::NaiveDate,
    pub completed: bool,
    pub points_earned: i64,
}

impl Revision {
    /// `5 * credits`, floored (credits and the multiplier are both integers
    /// so the floor is implicit).
    pub fn points_for_credits(credits: i64) -> i64 {
        5 * credits
    }
}

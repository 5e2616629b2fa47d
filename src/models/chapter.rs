use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Chapter {
    pub id: i64,
    pub subject_id: i64,
    pub number: i64,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    NotStarted,
    InProgress,
    Completed,
}

sqlite_str_enum!(ReadingStatus {
    NotStarted => "not_started",
    InProgress => "in_progress",
    Completed => "completed",
});

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Locked,
    Available,
    InProgress,
    Submitted,
}

sqlite_str_enum!(AssignmentStatus {
    Locked => "locked",
    Available => "available",
    InProgress => "in_progress",
    Submitted => "submitted",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ChapterProgress {
    pub chapter_id: i64,
    pub reading_status: ReadingStatus,
    pub assignment_status: AssignmentStatus,
    pub mastery_level: i64,
    pub revision_count: i64,
}

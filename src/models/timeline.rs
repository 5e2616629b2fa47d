use serde::{Deserialize, Serialize};

use super::sql_enum::sqlite_str_enum;

/// The closed set of block labels the Timeline Builder emits.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Sleep,
    WakeRoutine,
    Breakfast,
    Lunch,
    Dinner,
    University,
    Study,
    Revision,
    Practice,
    Assignment,
    LabWork,
    DeepWork,
    Break,
    FreeTime,
}

sqlite_str_enum!(ActivityType {
    Sleep => "sleep",
    WakeRoutine => "wake_routine",
    Breakfast => "breakfast",
    Lunch => "lunch",
    Dinner => "dinner",
    University => "university",
    Study => "study",
    Revision => "revision",
    Practice => "practice",
    Assignment => "assignment",
    LabWork => "lab_work",
    DeepWork => "deep_work",
    Break => "break",
    FreeTime => "free_time",
});

/// A contiguous labeled interval within a day's timeline.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Block {
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
    pub activity_type: ActivityType,
    pub energy_level: u8,
    pub label: Option<String>,
    pub task_id: Option<i64>,
}

impl Block {
    pub fn duration_mins(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GapClassification {
    Micro,
    Standard,
    DeepWork,
}

impl GapClassification {
    /// `micro (<=30)`, `standard (31-89)`, `deep_work (>=90)`.
    pub fn from_duration_mins(duration_mins: i64) -> Self {
        if duration_mins <= 30 {
            GapClassification::Micro
        } else if duration_mins < 90 {
            GapClassification::Standard
        } else {
            GapClassification::DeepWork
        }
    }
}

/// An unlabeled candidate interval for placement, between immutable blocks.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Gap {
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
    pub duration_mins: i64,
    pub classification: GapClassification,
}

impl Gap {
    pub fn new(start: chrono::NaiveDateTime, end: chrono::NaiveDateTime) -> Self {
        let duration_mins = (end - start).num_minutes();
        Gap {
            start,
            end,
            duration_mins,
            classification: GapClassification::from_duration_mins(duration_mins),
        }
    }
}

/// The full-day block sequence produced by the Timeline Builder. Immutable
/// after construction and safe to share.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Timeline {
    pub date: chrono::NaiveDate,
    pub blocks: Vec<Block>,
}

impl Timeline {
    /// The Timeline Builder's contiguity guarantee: a contiguous partition
    /// of the full day -- no gaps, no overlaps.
    pub fn is_contiguous_partition(&self) -> bool {
        if self.blocks.is_empty() {
            return false;
        }
        self.blocks.windows(2).all(|pair| pair[0].end == pair[1].start)
    }

    pub fn total_duration_mins(&self) -> i64 {
        self.blocks.iter().map(Block::duration_mins).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_classification_boundaries() {
        assert_eq!(GapClassification::from_duration_mins(30), GapClassification::Micro);
        assert_eq!(GapClassification::from_duration_mins(31), GapClassification::Standard);
        assert_eq!(GapClassification::from_duration_mins(89), GapClassification::Standard);
        assert_eq!(GapClassification::from_duration_mins(90), GapClassification::DeepWork);
    }
}

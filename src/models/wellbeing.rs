use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct WellbeingMetric {
    pub metric_date: chrono::NaiveDate,
    pub study_hours: f64,
    pub break_count: i64,
    pub overdue_tasks: i64,
    pub deep_work_sessions: i64,
    pub wellbeing_score: f64,
    pub recommendations_json: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    Short,
    Pomodoro,
    Meal,
    Exercise,
    Meditation,
    Walk,
    Long,
}

sqlite_str_enum!(BreakType {
    Short => "short",
    Pomodoro => "pomodoro",
    Meal => "meal",
    Exercise => "exercise",
    Meditation => "meditation",
    Walk => "walk",
    Long => "long",
});

impl BreakType {
    /// Default suggested duration in minutes, used when a break is started
    /// without an explicit `duration_hint`.
    pub fn default_duration_mins(self) -> i64 {
        match self {
            BreakType::Short => 5,
            BreakType::Pomodoro => 5,
            BreakType::Meal => 30,
            BreakType::Exercise => 30,
            BreakType::Meditation => 10,
            BreakType::Walk => 15,
            BreakType::Long => 20,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BreakSession {
    pub id: i64,
    pub break_type: BreakType,
    pub started_at: chrono::NaiveDateTime,
    pub ended_at: Option<chrono::NaiveDateTime>,
    pub suggested_duration_mins: i64,
    pub actual_duration_mins: Option<i64>,
    pub was_completed: Option<bool>,
}

impl BreakSession {
    /// A break "counts" once at least 70% of its suggested duration elapsed.
    pub fn completion_ratio_threshold() -> f64 {
        0.7
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

sqlite_str_enum!(PomodoroPhase {
    Idle => "idle",
    Work => "work",
    ShortBreak => "short_break",
    LongBreak => "long_break",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PomodoroStatus {
    pub current_phase: PomodoroPhase,
    pub cycles_completed: i64,
    pub phase_started_at: Option<chrono::NaiveDateTime>,
}

impl PomodoroStatus {
    /// Cycles `idle -> work -> short_break -> work -> ... -> long_break`
    /// every 4 completed work cycles, then back to work.
    pub fn advance(&self, now: chrono::NaiveDateTime) -> PomodoroStatus {
        let next_phase = match self.current_phase {
            PomodoroPhase::Idle => PomodoroPhase::Work,
            PomodoroPhase::Work => {
                if (self.cycles_completed + 1) % 4 == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Work,
        };
        let cycles_completed = if matches!(self.current_phase, PomodoroPhase::Work) {
            self.cycles_completed + 1
        } else {
            self.cycles_completed
        };
        PomodoroStatus {
            current_phase: next_phase,
            cycles_completed,
            phase_started_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn pomodoro_cycles_to_long_break_every_fourth_work_block() {
        let now = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut status = PomodoroStatus {
            current_phase: PomodoroPhase::Idle,
            cycles_completed: 0,
            phase_started_at: None,
        };
        let phases = [
            PomodoroPhase::Work,
            PomodoroPhase::ShortBreak,
            PomodoroPhase::Work,
            PomodoroPhase::ShortBreak,
            PomodoroPhase::Work,
            PomodoroPhase::ShortBreak,
            PomodoroPhase::Work,
            PomodoroPhase::LongBreak,
        ];
        for expected in phases {
            status = status.advance(now);
            assert_eq!(status.current_phase, expected);
        }
    }
}

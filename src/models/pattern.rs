use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::time_of_day::TimeOfDay;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SessionEffectiveness {
    pub id: i64,
    pub session_id: i64,
    pub subject_code: Option<String>,
    pub time_of_day: TimeOfDay,
    pub day_of_week: String,
    pub focus_score: f64,
    pub energy_level: i64,
    pub material_covered: Option<String>,
}

/// Running-average pattern for a subject (or the global pattern when
/// `subject_code` is `None`). `samples_count < 5` means callers should treat
/// `best_study_time` as "insufficient data".
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LearningPattern {
    pub subject_code: Option<String>,
    pub avg_duration: f64,
    pub best_study_time: Option<TimeOfDay>,
    pub effectiveness_score: f64,
    pub samples_count: i64,
}

impl LearningPattern {
    pub const MIN_SAMPLES_FOR_RECOMMENDATION: i64 = 5;

    pub fn has_enough_data(&self) -> bool {
        self.samples_count >= Self::MIN_SAMPLES_FOR_RECOMMENDATION
    }

    /// `avg := (avg*n + new)/(n+1)`, applied to both the duration and
    /// effectiveness running averages in lockstep.
    pub fn fold_in(&mut self, duration_seconds: f64, focus: f64) {
        let n = self.samples_count as f64;
        self.avg_duration = (self.avg_duration * n + duration_seconds) / (n + 1.0);
        self.effectiveness_score = (self.effectiveness_score * n + focus) / (n + 1.0);
        self.samples_count += 1;
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default)]
pub struct DailyStudyStats {
    pub study_date: chrono::NaiveDate,
    pub study_seconds: i64,
    pub deep_work_seconds: i64,
    pub sessions: i64,
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub rationale: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Timing,
    Duration,
    Break,
    SubjectOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_in_computes_running_average() {
        let mut pattern = LearningPattern {
            subject_code: Some("MATH101".into()),
            avg_duration: 1800.0,
            best_study_time: None,
            effectiveness_score: 0.6,
            samples_count: 1,
        };
        pattern.fold_in(3600.0, 0.8);
        assert_eq!(pattern.samples_count, 2);
        assert!((pattern.avg_duration - 2700.0).abs() < 1e-9);
        assert!((pattern.effectiveness_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn insufficient_data_below_five_samples() {
        let pattern = LearningPattern {
            subject_code: None,
            avg_duration: 0.0,
            best_study_time: None,
            effectiveness_score: 0.0,
            samples_count: 4,
        };
        assert!(!pattern.has_enough_data());
    }
}

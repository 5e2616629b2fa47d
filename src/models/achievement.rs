use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sql_enum::sqlite_str_enum;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Streak,
    Study,
    Goal,
    Revision,
    Special,
}

sqlite_str_enum!(AchievementCategory {
    Streak => "streak",
    Study => "study",
    Goal => "goal",
    Revision => "revision",
    Special => "special",
});

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AchievementDefinition {
    pub code: String,
    pub category: AchievementCategory,
    pub threshold_value: f64,
    pub points: i64,
    pub rarity: String,
    pub prerequisite_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct UserAchievement {
    pub achievement_code: String,
    pub progress_value: f64,
    pub is_complete: bool,
    pub earned_at: Option<chrono::NaiveDateTime>,
    pub notified: bool,
}

impl UserAchievement {
    /// `is_complete => progress_value >= threshold AND earned_at defined`.
    pub fn invariant_holds(&self, threshold: f64) -> bool {
        if self.is_complete {
            self.progress_value >= threshold && self.earned_at.is_some()
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn completed_achievement_must_meet_threshold_and_have_earned_at() {
        let achievement = UserAchievement {
            achievement_code: "seven_day_streak".into(),
            progress_value: 7.0,
            is_complete: true,
            earned_at: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()),
            notified: false,
        };
        assert!(achievement.invariant_holds(7.0));
    }

    #[test]
    fn incomplete_achievement_is_always_valid() {
        let achievement = UserAchievement {
            achievement_code: "seven_day_streak".into(),
            progress_value: 3.0,
            is_complete: false,
            earned_at: None,
            notified: false,
        };
        assert!(achievement.invariant_holds(7.0));
    }
}

use serde::{Deserialize, Serialize};

use super::sql_enum::sqlite_str_enum;

/// One of the six wall-clock buckets the Energy Model classifies an hour
/// into, and that `SessionEffectiveness`/`LearningPattern` key on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    Night,
    LateNight,
}

sqlite_str_enum!(TimeOfDay {
    EarlyMorning => "early_morning",
    Morning => "morning",
    Afternoon => "afternoon",
    Evening => "evening",
    Night => "night",
    LateNight => "late_night",
});

impl TimeOfDay {
    /// Classifies an hour-of-day (0-23) per the Energy Model's bucket table.
    ///
    /// The original bucket table lists both "early_morning <06" and
    /// "late_night 00-05", an overlapping pair that can't both be literal
    /// ranges across six *distinct* buckets. Resolved (see DESIGN.md) by
    /// splitting the small hours: `late_night` takes 00-03, `early_morning`
    /// takes 04-05, preserving all six named buckets with no gap or overlap.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=3 => TimeOfDay::LateNight,
            4..=5 => TimeOfDay::EarlyMorning,
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            21..=23 => TimeOfDay::Night,
            _ => TimeOfDay::LateNight,
        }
    }

    pub fn all() -> [TimeOfDay; 6] {
        [
            TimeOfDay::EarlyMorning,
            TimeOfDay::Morning,
            TimeOfDay::Afternoon,
            TimeOfDay::Evening,
            TimeOfDay::Night,
            TimeOfDay::LateNight,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_classification_matches_boundaries() {
        assert_eq!(TimeOfDay::from_hour(3), TimeOfDay::LateNight);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::EarlyMorning);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
    }
}

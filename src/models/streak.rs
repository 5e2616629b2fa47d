use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single register cell tracking the study streak. `longest_streak >=
/// current_streak` is an always-true invariant.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default)]
pub struct UserStreak {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_points: i64,
    pub last_activity: Option<chrono::NaiveDate>,
}

impl UserStreak {
    /// Applies the streak-update rule for an activity occurring on `today`.
    /// Used by both revision completion (no duration guard) and
    /// session stop (caller enforces the `>= 30 min` guard before calling).
    pub fn apply_activity(&self, today: chrono::NaiveDate) -> UserStreak {
        let mut next = self.clone();
        match self.last_activity {
            None => next.current_streak = 1,
            Some(last) if last < today - chrono::Duration::days(1) => next.current_streak = 1,
            Some(last) if last == today - chrono::Duration::days(1) => {
                next.current_streak += 1;
            }
            // last_activity == today: already counted today, no-op.
            _ => {}
        }
        next.last_activity = Some(today);
        next.longest_streak = next.longest_streak.max(next.current_streak);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn longest_streak_never_drops_below_current() {
        let streak = UserStreak {
            current_streak: 3,
            longest_streak: 5,
            total_points: 0,
            last_activity: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        };
        let next = streak.apply_activity(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert!(next.longest_streak >= next.current_streak);
        assert_eq!(next.current_streak, 4);
    }

    #[test]
    fn gap_of_two_or_more_days_resets_streak() {
        let streak = UserStreak {
            current_streak: 10,
            longest_streak: 10,
            total_points: 0,
            last_activity: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        };
        let next = streak.apply_activity(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 10);
    }

    #[test]
    fn same_day_activity_is_idempotent() {
        let streak = UserStreak {
            current_streak: 2,
            longest_streak: 2,
            total_points: 0,
            last_activity: Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        };
        let next = streak.apply_activity(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(next.current_streak, 2);
    }
}

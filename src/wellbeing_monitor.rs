//! The Wellbeing Monitor (C9): an idempotent daily score over study hours,
//! breaks, overdue tasks, and deep-work sessions, with threshold-triggered
//! recommendations. The recommendations are handed back as plain text; it is
//! the background loop's job to route them to the Notification Engine (C10)
//! as `suggestion` notifications.

use crate::error::CoreResult;
use crate::models::WellbeingMetric;
use crate::store::Store;

pub struct WellbeingMonitor<'a> {
    store: &'a Store,
}

impl<'a> WellbeingMonitor<'a> {
    pub fn new(store: &'a Store) -> Self {
        WellbeingMonitor { store }
    }

    /// `study_factor`: `+0.2` in the sustainable band, tapering off beyond
    /// 8 hours, and scaling down for very short days.
    fn study_factor(hours: f64) -> f64 {
        if (4.0..=8.0).contains(&hours) {
            0.2
        } else if hours > 8.0 {
            -0.1 * (hours - 8.0)
        } else {
            0.05 * hours
        }
    }

    fn break_factor(break_count: i64) -> f64 {
        (0.05 * break_count as f64).min(0.2)
    }

    fn overdue_factor(overdue_tasks: i64) -> f64 {
        -0.05 * overdue_tasks as f64
    }

    /// `wellbeing.score(date)`: `base = 0.5`, clamped to `[0, 1]`.
    pub fn compute_score(study_hours: f64, break_count: i64, overdue_tasks: i64) -> f64 {
        let base = 0.5;
        let score = base
            + Self::study_factor(study_hours)
            + Self::break_factor(break_count)
            + Self::overdue_factor(overdue_tasks);
        score.clamp(0.0, 1.0)
    }

    fn recommendations(
        score: f64,
        study_hours: f64,
        overdue_tasks: i64,
        skipped_breaks: i64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();
        if score < 0.4 {
            recommendations.push("Your wellbeing score is low -- take a 30-minute break.".to_string());
        }
        if study_hours > 10.0 {
            recommendations.push("You've studied over 10 hours today -- consider stopping.".to_string());
        }
        if overdue_tasks > 0 {
            recommendations.push("Focus on your overdue tasks first.".to_string());
        }
        if skipped_breaks > 0 {
            recommendations.push("Don't skip your next break.".to_string());
        }
        recommendations
    }

    /// Runs the daily computation for `date`, persisting the resulting
    /// `WellbeingMetric` and returning it alongside the recommendation text.
    /// Re-running for the same `date` overwrites the prior row, so repeated
    /// ticks within a day are idempotent.
    pub async fn run(&self, user_id: i64, date: chrono::NaiveDate, now: chrono::NaiveDateTime) -> CoreResult<(WellbeingMetric, Vec<String>)> {
        let stats = self.store.daily_study_stats(date).await?;
        let study_hours = stats.study_seconds as f64 / 3600.0;
        let break_count = self.store.break_count_on(date).await?;
        let overdue_tasks = self.store.overdue_task_count(user_id, now).await?;
        let deep_work_sessions = self.store.deep_work_session_count_on(date).await?;
        let skipped_breaks = self.store.skipped_break_count_on(date).await?;

        let score = Self::compute_score(study_hours, break_count, overdue_tasks);
        let recommendations = Self::recommendations(score, study_hours, overdue_tasks, skipped_breaks);

        let metric = WellbeingMetric {
            metric_date: date,
            study_hours,
            break_count,
            overdue_tasks,
            deep_work_sessions,
            wellbeing_score: score,
            recommendations_json: serde_json::to_string(&recommendations).unwrap_or_else(|_| "[]".to_string()),
        };
        let saved = self.store.upsert_wellbeing_metric(&metric).await?;
        Ok((saved, recommendations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustainable_band_gets_full_bonus() {
        assert!((WellbeingMonitor::study_factor(6.0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn overstudy_is_penalized() {
        let factor = WellbeingMonitor::study_factor(10.0);
        assert!((factor - (-0.2)).abs() < 1e-9);
    }

    #[test]
    fn break_factor_caps_at_point_two() {
        assert!((WellbeingMonitor::break_factor(10) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn score_clamps_into_unit_interval() {
        let score = WellbeingMonitor::compute_score(0.0, 0, 20);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn low_score_triggers_urgent_break_recommendation() {
        let recs = WellbeingMonitor::recommendations(0.2, 2.0, 0, 0);
        assert!(recs.iter().any(|r| r.contains("30-minute break")));
    }

    #[test]
    fn overdue_tasks_trigger_focus_recommendation() {
        let recs = WellbeingMonitor::recommendations(0.7, 5.0, 2, 0);
        assert!(recs.iter().any(|r| r.contains("overdue")));
    }
}

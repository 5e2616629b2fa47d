//! The Pattern Analyzer (C8): derives per-subject recommendations from
//! accumulated SessionEffectiveness samples.

use crate::error::CoreResult;
use crate::models::{LearningPattern, Recommendation, RecommendationKind, TimeOfDay};
use crate::store::Store;

pub struct PatternAnalyzer<'a> {
    store: &'a Store,
}

impl<'a> PatternAnalyzer<'a> {
    pub fn new(store: &'a Store) -> Self {
        PatternAnalyzer { store }
    }

    /// `optimal_time(subject) -> time_of_day`, `None` below the
    /// `samples_count >= 5` threshold.
    pub async fn optimal_time(&self, subject_code: Option<&str>) -> CoreResult<Option<TimeOfDay>> {
        let pattern = self.store.learning_pattern(subject_code).await?;
        Ok(if pattern.has_enough_data() { pattern.best_study_time } else { None })
    }

    /// `suggested_duration(subject) -> minutes`, clamped to `[25, 120]`.
    pub async fn suggested_duration(&self, subject_code: Option<&str>) -> CoreResult<Option<i64>> {
        let pattern = self.store.learning_pattern(subject_code).await?;
        if !pattern.has_enough_data() {
            return Ok(None);
        }
        let minutes = (pattern.avg_duration / 60.0).round() as i64;
        Ok(Some(minutes.clamp(25, 120)))
    }

    pub async fn recommendations(&self, subject_code: Option<&str>) -> CoreResult<Vec<Recommendation>> {
        let pattern = self.store.learning_pattern(subject_code).await?;
        if !pattern.has_enough_data() {
            return Ok(Vec::new());
        }

        let mut recommendations = Vec::new();
        if let Some(time_of_day) = pattern.best_study_time {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Timing,
                rationale: format!("historically most effective around {time_of_day:?}"),
            });
        }
        recommendations.push(Recommendation {
            kind: RecommendationKind::Duration,
            rationale: format!(
                "sessions around {:.0} minutes have matched your usual focus",
                (pattern.avg_duration / 60.0).clamp(25.0, 120.0)
            ),
        });
        if pattern.effectiveness_score < 0.5 {
            recommendations.push(Recommendation {
                kind: RecommendationKind::Break,
                rationale: "recent focus scores are low; a break before the next block may help".into(),
            });
        }
        Ok(recommendations)
    }

    pub async fn record_sample(&self, pattern: &LearningPattern) -> CoreResult<()> {
        self.store
            .fold_learning_pattern(
                pattern.subject_code.as_deref(),
                pattern.avg_duration,
                pattern.effectiveness_score,
                pattern.best_study_time.unwrap_or(TimeOfDay::Morning),
            )
            .await?;
        Ok(())
    }
}

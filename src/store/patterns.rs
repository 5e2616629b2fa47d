use crate::error::CoreResult;
use crate::models::{LearningPattern, SessionEffectiveness, TimeOfDay};

use super::Store;

impl Store {
    pub async fn record_session_effectiveness(
        &self,
        session_id: i64,
        subject_code: Option<&str>,
        time_of_day: TimeOfDay,
        day_of_week: &str,
        focus_score: f64,
        energy_level: i64,
        material_covered: Option<&str>,
    ) -> CoreResult<SessionEffectiveness> {
        sqlx::query_as::<_, SessionEffectiveness>(
            "INSERT INTO session_effectiveness
                (session_id, subject_code, time_of_day, day_of_week, focus_score, energy_level, material_covered)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(session_id)
        .bind(subject_code)
        .bind(time_of_day)
        .bind(day_of_week)
        .bind(focus_score)
        .bind(energy_level)
        .bind(material_covered)
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    /// Loads (or lazily creates) the running pattern for a subject, or the
    /// global pattern when `subject_code` is `None`.
    pub async fn learning_pattern(&self, subject_code: Option<&str>) -> CoreResult<LearningPattern> {
        let key = subject_code.unwrap_or("__global__");
        let row = sqlx::query_as::<_, LearningPatternRow>(
            "SELECT subject_code, avg_duration, best_study_time, effectiveness_score, samples_count
             FROM learning_patterns WHERE subject_code = ?",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(LearningPatternRow::into_model).unwrap_or(LearningPattern {
            subject_code: subject_code.map(str::to_string),
            avg_duration: 0.0,
            best_study_time: None,
            effectiveness_score: 0.0,
            samples_count: 0,
        }))
    }

    /// Folds a new sample into the running average and persists it
    /// (`avg := (avg*n + new)/(n+1)`).
    pub async fn fold_learning_pattern(
        &self,
        subject_code: Option<&str>,
        duration_seconds: f64,
        focus: f64,
        best_study_time: TimeOfDay,
    ) -> CoreResult<LearningPattern> {
        let key = subject_code.unwrap_or("__global__").to_string();
        let mut pattern = self.learning_pattern(subject_code).await?;
        pattern.fold_in(duration_seconds, focus);
        pattern.best_study_time = Some(best_study_time);

        sqlx::query(
            "INSERT INTO learning_patterns (subject_code, avg_duration, best_study_time, effectiveness_score, samples_count)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(subject_code) DO UPDATE SET
                avg_duration = excluded.avg_duration,
                best_study_time = excluded.best_study_time,
                effectiveness_score = excluded.effectiveness_score,
                samples_count = excluded.samples_count",
        )
        .bind(key)
        .bind(pattern.avg_duration)
        .bind(pattern.best_study_time)
        .bind(pattern.effectiveness_score)
        .bind(pattern.samples_count)
        .execute(self.pool())
        .await?;

        Ok(pattern)
    }
}

#[derive(sqlx::FromRow)]
struct LearningPatternRow {
    subject_code: String,
    avg_duration: f64,
    best_study_time: Option<TimeOfDay>,
    effectiveness_score: f64,
    samples_count: i64,
}

impl LearningPatternRow {
    fn into_model(self) -> LearningPattern {
        LearningPattern {
            subject_code: if self.subject_code == "__global__" {
                None
            } else {
                Some(self.subject_code)
            },
            avg_duration: self.avg_duration,
            best_study_time: self.best_study_time,
            effectiveness_score: self.effectiveness_score,
            samples_count: self.samples_count,
        }
    }
}

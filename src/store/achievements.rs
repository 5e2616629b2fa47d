use crate::error::CoreResult;
use crate::models::{AchievementDefinition, UserAchievement};

use super::Store;

impl Store {
    pub async fn achievement_catalog(&self) -> CoreResult<Vec<AchievementDefinition>> {
        sqlx::query_as::<_, AchievementDefinition>("SELECT * FROM achievement_definitions")
            .fetch_all(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn seed_achievement_definition(&self, definition: &AchievementDefinition) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO achievement_definitions (code, category, threshold_value, points, rarity, prerequisite_code)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(code) DO NOTHING",
        )
        .bind(&definition.code)
        .bind(definition.category)
        .bind(definition.threshold_value)
        .bind(definition.points)
        .bind(&definition.rarity)
        .bind(&definition.prerequisite_code)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn user_achievement(&self, code: &str) -> CoreResult<UserAchievement> {
        sqlx::query_as::<_, UserAchievement>("SELECT * FROM user_achievements WHERE achievement_code = ?")
            .bind(code)
            .fetch_optional(self.pool())
            .await?
            .map(Ok)
            .unwrap_or_else(|| {
                Ok(UserAchievement {
                    achievement_code: code.to_string(),
                    progress_value: 0.0,
                    is_complete: false,
                    earned_at: None,
                    notified: false,
                })
            })
    }

    /// Upserts progress for one achievement: if the threshold is crossed and
    /// it wasn't already complete, stamps `earned_at` and flips
    /// `is_complete`, leaving `notified = false` for the Notification Engine
    /// to flush.
    pub async fn upsert_achievement_progress(
        &self,
        code: &str,
        progress_value: f64,
        threshold: f64,
        now: chrono::NaiveDateTime,
    ) -> CoreResult<UserAchievement> {
        let existing = self.user_achievement(code).await?;
        let newly_complete = !existing.is_complete && progress_value >= threshold;
        let is_complete = existing.is_complete || newly_complete;
        let earned_at = if newly_complete { Some(now) } else { existing.earned_at };
        let notified = if newly_complete { false } else { existing.notified };

        sqlx::query(
            "INSERT INTO user_achievements (achievement_code, progress_value, is_complete, earned_at, notified)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(achievement_code) DO UPDATE SET
                progress_value = excluded.progress_value,
                is_complete = excluded.is_complete,
                earned_at = excluded.earned_at,
                notified = excluded.notified",
        )
        .bind(code)
        .bind(progress_value)
        .bind(is_complete)
        .bind(earned_at)
        .bind(notified)
        .execute(self.pool())
        .await?;

        Ok(UserAchievement {
            achievement_code: code.to_string(),
            progress_value,
            is_complete,
            earned_at,
            notified,
        })
    }

    pub async fn unnotified_achievements(&self) -> CoreResult<Vec<UserAchievement>> {
        sqlx::query_as::<_, UserAchievement>(
            "SELECT * FROM user_achievements WHERE is_complete = 1 AND notified = 0",
        )
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn mark_achievement_notified(&self, code: &str) -> CoreResult<()> {
        sqlx::query("UPDATE user_achievements SET notified = 1 WHERE achievement_code = ?")
            .bind(code)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

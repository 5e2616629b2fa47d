//! The Achievement Evaluator (C11): walks the fixed achievement catalog on
//! every relevant event and upserts progress against each definition's
//! `threshold_value`. Notification flushing is C10's job; this module only
//! leaves `notified = false` rows behind for it to find.

use crate::error::CoreResult;
use crate::models::{AchievementCategory, UserAchievement};
use crate::store::Store;

pub struct AchievementEvaluator<'a> {
    store: &'a Store,
}

impl<'a> AchievementEvaluator<'a> {
    pub fn new(store: &'a Store) -> Self {
        AchievementEvaluator { store }
    }

    /// The current value of the counter a category tracks. `Special`
    /// achievements have no generic counter and are left untouched here --
    /// they are expected to be upserted directly by whatever bespoke trigger
    /// defines them.
    async fn current_progress(&self, user_id: i64, category: AchievementCategory) -> CoreResult<Option<f64>> {
        let value = match category {
            AchievementCategory::Streak => Some(self.store.user_streak().await?.current_streak as f64),
            AchievementCategory::Study => Some(self.store.total_study_seconds().await? as f64 / 3600.0),
            AchievementCategory::Goal => Some(self.store.completed_task_count(user_id).await? as f64),
            AchievementCategory::Revision => Some(self.store.completed_revision_count().await? as f64),
            AchievementCategory::Special => None,
        };
        Ok(value)
    }

    /// Re-evaluates every definition in the catalog against its current
    /// counter and upserts progress, returning the ones that just crossed
    /// their threshold (`is_complete` newly `true`) for callers that want to
    /// react immediately instead of waiting for the next notification scan.
    pub async fn evaluate_all(&self, user_id: i64, now: chrono::NaiveDateTime) -> CoreResult<Vec<UserAchievement>> {
        let catalog = self.store.achievement_catalog().await?;
        let mut newly_earned = Vec::new();

        for definition in catalog {
            let Some(progress_value) = self.current_progress(user_id, definition.category).await? else {
                continue;
            };
            let before = self.store.user_achievement(&definition.code).await?;
            let after = self
                .store
                .upsert_achievement_progress(&definition.code, progress_value, definition.threshold_value, now)
                .await?;
            if after.is_complete && !before.is_complete {
                newly_earned.push(after);
            }
        }
        Ok(newly_earned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    /// Special achievements require a bespoke caller, not a counter this
    /// module can compute, so `current_progress` returns `None` without
    /// ever touching the store -- the pool here is never queried.
    #[tokio::test]
    async fn special_category_has_no_generic_counter() {
        let pool = sqlx::Pool::<sqlx::Sqlite>::connect_lazy("sqlite::memory:").expect("lazy pool construction");
        let store = Store::new(pool);
        let evaluator = AchievementEvaluator::new(&store);

        let progress = evaluator.current_progress(1, AchievementCategory::Special).await.unwrap();
        assert_eq!(progress, None);
    }
}

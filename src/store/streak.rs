use crate::error::CoreResult;
use crate::models::UserStreak;

use super::Store;

impl Store {
    pub async fn user_streak(&self) -> CoreResult<UserStreak> {
        sqlx::query_as::<_, UserStreak>(
            "SELECT current_streak, longest_streak, total_points, last_activity FROM user_streak",
        )
        .fetch_one(self.pool())
        .await
        .map_err(Into::into)
    }

    /// Applies the streak-update rule as its own transaction. Used
    /// directly by callers outside an existing transaction (e.g. the
    /// Revision Scheduler); session stop instead calls
    /// [`Store::apply_streak_activity_tx`] so it shares the stop-session
    /// transaction.
    pub async fn apply_streak_activity(&self, today: chrono::NaiveDate) -> CoreResult<UserStreak> {
        let mut tx = self.pool().begin().await?;
        let streak = self.apply_streak_activity_tx(&mut tx, today).await?;
        tx.commit().await?;
        Ok(streak)
    }

    pub(super) async fn apply_streak_activity_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        today: chrono::NaiveDate,
    ) -> CoreResult<UserStreak> {
        let current = sqlx::query_as::<_, UserStreak>(
            "SELECT current_streak, longest_streak, total_points, last_activity FROM user_streak",
        )
        .fetch_one(&mut **tx)
        .await?;

        let next = current.apply_activity(today);

        sqlx::query(
            "UPDATE user_streak
             SET current_streak = ?, longest_streak = ?, last_activity = ?",
        )
        .bind(next.current_streak)
        .bind(next.longest_streak)
        .bind(next.last_activity)
        .execute(&mut **tx)
        .await?;

        Ok(next)
    }

    pub async fn add_streak_points(&self, points: i64) -> CoreResult<()> {
        sqlx::query("UPDATE user_streak SET total_points = total_points + ?")
            .bind(points)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

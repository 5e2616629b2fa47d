use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};
use std::path::PathBuf;

pub async fn establish_pool(db_path: PathBuf) -> Result<Pool<Sqlite>, sqlx::Error> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite:{}?mode=rwc", db_path.display()))
        .await
}

/// Seeds the process's single user row and the three register cells
/// (`active_timer`, `pomodoro_status`, `user_streak`). These three tables
/// carry no identifying key at all -- each is seeded with its one row here,
/// guarded by `WHERE NOT EXISTS` rather than a unique key, and the Store API
/// never exposes a way to insert a second one or delete the only one. The
/// one-row invariant lives in that API surface, not in a schema constraint.
pub async fn ensure_singletons(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO users (id, name, email) VALUES (1, 'Student', NULL)")
        .execute(pool)
        .await?;

    sqlx::query(
        "INSERT INTO active_timer (session_id)
         SELECT NULL WHERE NOT EXISTS (SELECT 1 FROM active_timer)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO pomodoro_status (current_phase, cycles_completed, phase_started_at)
         SELECT 'idle', 0, NULL WHERE NOT EXISTS (SELECT 1 FROM pomodoro_status)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO user_streak (current_streak, longest_streak, total_points, last_activity)
         SELECT 0, 0, 0, NULL WHERE NOT EXISTS (SELECT 1 FROM user_streak)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

//! The Store (C1): the single point of persistence for the engine. Wraps a
//! `sqlx::Pool<Sqlite>`; every cross-row invariant (revision generation on
//! chapter completion, streak update on completion, daily-stats rollup) is
//! an atomic Store operation rather than a database trigger.

pub mod achievements;
pub mod chapters;
pub mod lab_reports;
pub mod misc;
pub mod notifications;
pub mod patterns;
pub mod revisions;
pub mod sessions;
pub mod streak;
pub mod subjects;
pub mod tasks;
pub mod wellbeing;

#[derive(Debug, Clone)]
pub struct Store {
    pool: sqlx::Pool<sqlx::Sqlite>,
}

impl Store {
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        Store { pool }
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }
}

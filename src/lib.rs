pub mod achievement_evaluator;
pub mod background;
pub mod config;
pub mod db;
pub mod energy;
pub mod error;
pub mod gap_analyzer;
pub mod models;
pub mod notification_engine;
pub mod operations;
pub mod pattern_analyzer;
pub mod placer;
pub mod revision_scheduler;
pub mod store;
pub mod timeline_builder;
pub mod timer;
pub mod wellbeing_monitor;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use operations::Core;
pub use store::Store;

/// Opens the pool, runs migrations, and seeds the singleton rows -- the
/// shared setup every binary entry point (the daemon, tests) needs before
/// constructing a [`Core`].
pub async fn bootstrap(db_path: std::path::PathBuf, config: Config) -> CoreResult<Core> {
    let pool = db::connection::establish_pool(db_path)
        .await
        .map_err(|err| CoreError::BackendUnavailable(err.to_string()))?;
    db::migrations::run_migrations(&pool).await?;
    db::connection::ensure_singletons(&pool)
        .await
        .map_err(|err| CoreError::BackendUnavailable(err.to_string()))?;

    Ok(Core::new(Store::new(pool), config))
}

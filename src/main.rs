use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use study_timeline_engine::{background, Config};

fn db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("study-timeline-engine").join("life-os.sqlite"))
        .unwrap_or_else(|| PathBuf::from("life-os.sqlite"))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let path = db_path();
    log::info!("SQLite DB path: {}", path.display());

    let config = Config::load_or_default();
    let core = study_timeline_engine::bootstrap(path, config)
        .await
        .expect("failed to bootstrap engine");

    let cancel = CancellationToken::new();
    let notifications = core.notifications();
    let store = core.store().clone();

    let notification_task = tokio::spawn(background::run_notification_loop(notifications, cancel.clone()));
    let wellbeing_task = tokio::spawn(background::run_wellbeing_loop(store.clone(), cancel.clone()));
    let achievement_task = tokio::spawn(background::run_achievement_loop(store, cancel.clone()));

    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    log::info!("shutting down");
    cancel.cancel();

    let _ = tokio::join!(notification_task, wellbeing_task, achievement_task);
}

//! Cancellable background loops for the three proactive components (C9,
//! C10, C11). Each loop runs on its own tick cadence and backs off on
//! `BackendUnavailable` errors instead of busy-looping against a database
//! that's temporarily down.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::achievement_evaluator::AchievementEvaluator;
use crate::error::{CoreError, ErrorCode};
use crate::notification_engine::NotificationEngine;
use crate::store::Store;
use crate::wellbeing_monitor::WellbeingMonitor;

const NOTIFICATION_TICK: Duration = Duration::from_secs(15 * 60);
const WELLBEING_TICK: Duration = Duration::from_secs(60 * 60);
const ACHIEVEMENT_TICK: Duration = Duration::from_secs(5 * 60);
const MAX_BACKOFF: Duration = Duration::from_secs(5 * 60);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

const DEFAULT_USER_ID: i64 = 1;

/// Doubles `backoff` on a `BackendUnavailable` error, capped at
/// `MAX_BACKOFF`; resets to `INITIAL_BACKOFF` on success.
fn next_backoff(current: Duration, error: &CoreError) -> Duration {
    if error.code() == ErrorCode::BackendUnavailable {
        (current * 2).min(MAX_BACKOFF)
    } else {
        current
    }
}

pub async fn run_notification_loop(engine: Arc<NotificationEngine>, cancel: CancellationToken) {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(NOTIFICATION_TICK) => {}
        }

        match engine.tick(current_time()).await {
            Ok(()) => backoff = INITIAL_BACKOFF,
            Err(err) => {
                log::warn!("notification tick failed: {err}");
                backoff = next_backoff(backoff, &err);
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
    }
}

pub async fn run_wellbeing_loop(store: Store, cancel: CancellationToken) {
    let monitor = WellbeingMonitor::new(&store);
    let mut backoff = INITIAL_BACKOFF;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(WELLBEING_TICK) => {}
        }

        let now = current_time();
        match monitor.run(DEFAULT_USER_ID, now.date(), now).await {
            Ok(_) => backoff = INITIAL_BACKOFF,
            Err(err) => {
                log::warn!("wellbeing tick failed: {err}");
                backoff = next_backoff(backoff, &err);
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
    }
}

pub async fn run_achievement_loop(store: Store, cancel: CancellationToken) {
    let evaluator = AchievementEvaluator::new(&store);
    let mut backoff = INITIAL_BACKOFF;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(ACHIEVEMENT_TICK) => {}
        }

        match evaluator.evaluate_all(DEFAULT_USER_ID, current_time()).await {
            Ok(newly_earned) => {
                backoff = INITIAL_BACKOFF;
                for achievement in newly_earned {
                    log::info!("achievement earned: {}", achievement.achievement_code);
                }
            }
            Err(err) => {
                log::warn!("achievement tick failed: {err}");
                backoff = next_backoff(backoff, &err);
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
        }
    }
}

fn current_time() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_only_on_backend_unavailable() {
        let backend_err = CoreError::BackendUnavailable("db down".into());
        let validation_err = CoreError::validation("bad input");

        assert_eq!(next_backoff(Duration::from_secs(1), &backend_err), Duration::from_secs(2));
        assert_eq!(next_backoff(Duration::from_secs(1), &validation_err), Duration::from_secs(1));
    }

    #[test]
    fn backoff_caps_at_max() {
        let backend_err = CoreError::BackendUnavailable("db down".into());
        assert_eq!(next_backoff(MAX_BACKOFF, &backend_err), MAX_BACKOFF);
    }
}

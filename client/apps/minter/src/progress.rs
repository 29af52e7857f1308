//! Run observer
//!
//! Logs solver throughput and admission state changes while a run is in
//! progress.

use mint::AdmissionState;
use pow::SearchProgress;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const REPORT_EVERY: Duration = Duration::from_secs(2);

/// Spawn a task that reports until the state becomes terminal or the
/// sender is dropped
pub fn observe(progress: SearchProgress, mut state: watch::Receiver<AdmissionState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(REPORT_EVERY);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = state.changed() => {
                    if changed.is_err() || state.borrow_and_update().is_terminal() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if *state.borrow() == AdmissionState::Solving {
                        let attempts = progress.attempts();
                        let secs = started.elapsed().as_secs_f64().max(f64::EPSILON);
                        tracing::info!(attempts, hash_rate = (attempts as f64 / secs) as u64, "Solving");
                    }
                }
            }
        }
    })
}

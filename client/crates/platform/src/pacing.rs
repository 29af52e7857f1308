//! Request pacing
//!
//! Spacing of outbound requests and wall-clock scheduling for time-boxed
//! openings.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Pacing configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacingConfig {
    /// Gap between two consecutive dispatches; `None` sends back to back
    pub interval: Option<Duration>,
}

impl PacingConfig {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval: (!interval.is_zero()).then_some(interval),
        }
    }

    pub fn burst() -> Self {
        Self::default()
    }

    pub fn is_burst(&self) -> bool {
        self.interval.is_none()
    }
}

/// Paces dispatches at a fixed interval
///
/// The first `tick` completes immediately. Missed ticks are not replayed as a
/// burst: a late dispatch pushes the schedule back instead.
pub struct Pacer {
    interval: Option<tokio::time::Interval>,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        let interval = config.interval.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now(), period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        Self { interval }
    }

    /// Wait until the next dispatch slot
    pub async fn tick(&mut self) {
        if let Some(interval) = self.interval.as_mut() {
            interval.tick().await;
        }
    }
}

/// Time remaining until `at`, or zero if it has passed
pub fn until(at: DateTime<Utc>) -> Duration {
    (at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
}

/// Sleep until a wall-clock instant
///
/// Returns immediately if the instant has already passed.
pub async fn sleep_until(at: DateTime<Utc>) {
    let wait = until(at);
    if !wait.is_zero() {
        tracing::info!(at = %at, wait_ms = wait.as_millis() as u64, "Waiting for scheduled time");
        tokio::time::sleep(wait).await;
    }
}

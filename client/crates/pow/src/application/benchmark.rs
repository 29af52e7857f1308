//! Benchmark Use Case
//!
//! Measures solver throughput against a random challenge.

use crate::domain::search::{SearchControl, solve_parallel};
use crate::domain::services::verify;
use crate::domain::value_objects::{Difficulty, Nonce};
use std::time::{Duration, Instant};

/// One benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub difficulty: Difficulty,
    pub threads: usize,
    pub nonce: Nonce,
    pub attempts: u64,
    pub elapsed: Duration,
}

impl BenchmarkReport {
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.attempts as f64 / secs } else { 0.0 }
    }
}

/// Solve a freshly generated challenge and report the rate
///
/// Blocking; call from `spawn_blocking` in async contexts. Returns `None`
/// if `control` stops the search first.
pub fn run_benchmark(
    difficulty: Difficulty,
    threads: usize,
    control: &SearchControl,
) -> Option<BenchmarkReport> {
    let challenge = hex::encode(platform::crypto::random_bytes(16));
    let identity = "bench";

    let started = Instant::now();
    let nonce = solve_parallel(&challenge, identity, difficulty, threads, control)?;
    let elapsed = started.elapsed();
    debug_assert!(verify(&challenge, identity, nonce, difficulty));

    let report = BenchmarkReport {
        difficulty,
        threads,
        nonce,
        attempts: control.progress().attempts(),
        elapsed,
    };
    tracing::info!(
        difficulty = %difficulty,
        threads,
        attempts = report.attempts,
        elapsed_ms = elapsed.as_millis() as u64,
        hash_rate = report.hash_rate() as u64,
        "Benchmark finished"
    );
    Some(report)
}

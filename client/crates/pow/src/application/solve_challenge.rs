//! Solve Challenge Use Case

use crate::application::config::SolverConfig;
use crate::domain::entities::Challenge;
use crate::domain::search::{SearchControl, solve_parallel};
use crate::domain::value_objects::Nonce;
use crate::error::{PowError, PowResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Output DTO for solve challenge
#[derive(Debug, Clone)]
pub struct SolveChallengeOutput {
    pub nonce: Nonce,
    /// Candidates hashed across all workers
    pub attempts: u64,
    pub elapsed: Duration,
}

impl SolveChallengeOutput {
    pub fn hash_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.attempts as f64 / secs } else { 0.0 }
    }
}

/// Solve Challenge Use Case
///
/// Runs the CPU-bound search on the blocking pool so async callers keep
/// making progress (e.g. fan-out tasks for an earlier solution).
pub struct SolveChallengeUseCase {
    config: Arc<SolverConfig>,
}

/// Stops the search if the awaiting future is dropped mid-search
struct StopOnDrop(Option<SearchControl>);

impl StopOnDrop {
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        if let Some(control) = &self.0 {
            control.stop();
        }
    }
}

impl SolveChallengeUseCase {
    pub fn new(config: Arc<SolverConfig>) -> Self {
        Self { config }
    }

    pub async fn execute(
        &self,
        challenge: &Challenge,
        identity: &str,
        control: SearchControl,
    ) -> PowResult<SolveChallengeOutput> {
        self.config.validate()?;

        let control = match self.config.budget {
            Some(budget) => control.with_deadline(Instant::now() + budget),
            None => control,
        }
        .with_batch(self.config.progress_batch);
        let guard = StopOnDrop(Some(control.clone()));
        let attempts_before = control.progress().attempts();

        tracing::info!(
            difficulty = %challenge.difficulty,
            expected_attempts = challenge.difficulty.expected_attempts(),
            threads = self.config.threads,
            "Solving challenge"
        );

        let started = Instant::now();
        let value = challenge.value.clone();
        let identity = identity.to_string();
        let difficulty = challenge.difficulty;
        let threads = self.config.threads;
        let worker_control = control.clone();
        let found = tokio::task::spawn_blocking(move || {
            solve_parallel(&value, &identity, difficulty, threads, &worker_control)
        })
        .await
        .map_err(|e| PowError::Internal(e.to_string()))?;
        let stopped = control.is_stopped();
        guard.disarm();

        let attempts = control.progress().attempts() - attempts_before;
        let elapsed = started.elapsed();
        match found {
            Some(nonce) => {
                tracing::info!(
                    nonce = %nonce,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Challenge solved"
                );
                Ok(SolveChallengeOutput {
                    nonce,
                    attempts,
                    elapsed,
                })
            }
            None => {
                let err = match self.config.budget {
                    Some(budget) if !stopped && control.deadline_passed() => {
                        PowError::BudgetExhausted { budget, attempts }
                    }
                    _ => PowError::Cancelled { attempts },
                };
                err.log();
                Err(err)
            }
        }
    }
}

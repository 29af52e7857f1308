//! Submit Solution Use Case

use crate::application::config::MintConfig;
use crate::application::saturate::{FanoutOutcome, Submission, saturate, submit_once};
use crate::application::strategy::SubmissionStrategy;
use crate::domain::entities::Winner;
use crate::domain::repository::MintGateway;
use crate::error::{AttemptFailure, ExhaustedReport, FailureClass, MintError, MintResult};
use std::sync::Arc;
use std::time::Duration;

/// Output DTO for submit solution
#[derive(Debug, Clone)]
pub struct SubmitSolutionOutput {
    pub winner: Winner,
    pub dispatched: usize,
    pub late_successes: usize,
    pub duplicates: usize,
}

impl From<FanoutOutcome> for SubmitSolutionOutput {
    fn from(outcome: FanoutOutcome) -> Self {
        Self {
            winner: outcome.winner,
            dispatched: outcome.dispatched,
            late_successes: outcome.late_successes,
            duplicates: outcome.duplicates,
        }
    }
}

/// Submit Solution Use Case
///
/// Delivers solved nonces with the configured strategy until one
/// reservation is won.
pub struct SubmitSolutionUseCase<G>
where
    G: MintGateway,
{
    gateway: Arc<G>,
    config: Arc<MintConfig>,
}

impl<G> SubmitSolutionUseCase<G>
where
    G: MintGateway + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, config: Arc<MintConfig>) -> Self {
        Self { gateway, config }
    }

    pub async fn execute(&self, submissions: Vec<Submission>) -> MintResult<SubmitSolutionOutput> {
        if submissions.is_empty() {
            return Err(MintError::NoSolutions);
        }
        tracing::info!(strategy = %self.config.strategy, solutions = submissions.len(), "Submitting");

        match self.config.strategy {
            SubmissionStrategy::SingleRetry {
                attempt_timeout,
                retries,
                backoff,
            } => self.submit_with_retry(&submissions, attempt_timeout, retries, backoff).await,
            strategy => {
                let plan = strategy
                    .fanout_plan(self.config.drain_window)
                    .ok_or_else(|| MintError::Config(format!("{strategy} has no fan-out plan")))?;
                saturate(Arc::clone(&self.gateway), submissions, &plan)
                    .await
                    .map(SubmitSolutionOutput::from)
            }
        }
    }

    /// Sequential attempts per solution; a duplicate moves on to the next one
    async fn submit_with_retry(
        &self,
        submissions: &[Submission],
        attempt_timeout: Duration,
        retries: u32,
        backoff: Duration,
    ) -> MintResult<SubmitSolutionOutput> {
        let mut failures: Vec<AttemptFailure> = Vec::new();
        let mut dispatched = 0usize;

        for submission in submissions {
            for attempt in 1..=retries + 1 {
                dispatched += 1;
                match submit_once(self.gateway.as_ref(), &submission.request, attempt_timeout).await {
                    Ok(reservation) => {
                        tracing::info!(label = %submission.label, attempt, "Reservation won");
                        let duplicates = failures
                            .iter()
                            .filter(|f| f.class == FailureClass::Duplicate)
                            .count();
                        return Ok(SubmitSolutionOutput {
                            winner: Winner {
                                label: submission.label.clone(),
                                attempt,
                                reservation,
                            },
                            dispatched,
                            late_successes: 0,
                            duplicates,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(label = %submission.label, attempt, error = %e, "Submission failed");
                        let duplicate = matches!(e, MintError::BenignDuplicate(_));
                        failures.push(AttemptFailure::new(&submission.label, attempt, &e));
                        if duplicate {
                            break;
                        }
                        if attempt <= retries {
                            tokio::time::sleep(backoff).await;
                        }
                    }
                }
            }
        }
        Err(MintError::Exhausted(ExhaustedReport::new(failures)))
    }
}

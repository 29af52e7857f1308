//! Saturated submission
//!
//! Sends `copies` requests per solution and keeps the first reservation to
//! arrive. Requests run as independent tasks, each with its own timeout, and
//! report into a single-consumer channel. Only the consumer writes the
//! winner slot, so exactly one reservation is carried forward.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use platform::pacing::{Pacer, PacingConfig};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::domain::entities::{MintReply, Reservation, Solution, Winner};
use crate::domain::repository::MintGateway;
use crate::domain::value_objects::SubmissionRequest;
use crate::error::{AttemptFailure, ExhaustedReport, MintError, MintResult};

/// A labelled request to submit
#[derive(Debug, Clone)]
pub struct Submission {
    pub label: String,
    pub request: SubmissionRequest,
}

impl From<&Solution> for Submission {
    fn from(solution: &Solution) -> Self {
        Self {
            label: solution.label.clone(),
            request: solution.request.clone(),
        }
    }
}

/// Fan-out parameters
#[derive(Debug, Clone, Copy)]
pub struct FanoutPlan {
    pub copies: u32,
    pub pacing: PacingConfig,
    pub attempt_timeout: Duration,
    /// Keep collecting after the win; zero returns immediately
    pub drain: Duration,
}

/// Set-once holder of the winning reservation
#[derive(Debug, Default)]
pub struct WinnerSlot(OnceLock<Winner>);

impl WinnerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `winner` if the slot is empty; returns whether it was recorded
    pub fn offer(&self, winner: Winner) -> bool {
        self.0.set(winner).is_ok()
    }

    pub fn get(&self) -> Option<&Winner> {
        self.0.get()
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Result of a won fan-out round
#[derive(Debug, Clone)]
pub struct FanoutOutcome {
    pub winner: Winner,
    /// Requests actually sent
    pub dispatched: usize,
    /// Results collected before returning
    pub completed: usize,
    /// Successes that arrived after the winner
    pub late_successes: usize,
    pub duplicates: usize,
    pub failures: Vec<AttemptFailure>,
}

struct AttemptResult {
    label: String,
    attempt: u32,
    elapsed: Duration,
    outcome: MintResult<Reservation>,
}

/// Send one submission under `timeout`
///
/// A challenge in reply to a submission means the nonce was not accepted.
pub(crate) async fn submit_once<G: MintGateway>(
    gateway: &G,
    request: &SubmissionRequest,
    timeout: Duration,
) -> MintResult<Reservation> {
    match tokio::time::timeout(timeout, gateway.request_mint(request)).await {
        Err(_) => Err(MintError::timeout(timeout)),
        Ok(Err(e)) => Err(e),
        Ok(Ok(MintReply::Reservation(reservation))) => Ok(reservation),
        Ok(Ok(MintReply::Challenge(_))) => Err(MintError::Rejected {
            status: 200,
            message: "new challenge issued; nonce not accepted".into(),
        }),
    }
}

/// Run one fan-out round over `submissions`
///
/// Dispatch is solution-major: every copy of the first solution, then the
/// second. Attempt numbers are 1-based per solution. With no winner the
/// error lists one failure per dispatched request.
pub async fn saturate<G>(
    gateway: Arc<G>,
    submissions: Vec<Submission>,
    plan: &FanoutPlan,
) -> MintResult<FanoutOutcome>
where
    G: MintGateway + Sync + 'static,
{
    if submissions.is_empty() {
        return Err(MintError::NoSolutions);
    }
    let copies = plan.copies.max(1);
    tracing::info!(
        solutions = submissions.len(),
        copies,
        total = submissions.len() * copies as usize,
        burst = plan.pacing.is_burst(),
        timeout_ms = plan.attempt_timeout.as_millis() as u64,
        "Starting saturated submission"
    );

    let slot = Arc::new(WinnerSlot::new());
    let dispatched = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = tokio::spawn(dispatch(
        gateway,
        submissions,
        copies,
        *plan,
        Arc::clone(&slot),
        Arc::clone(&dispatched),
        tx,
    ));

    let started = Instant::now();
    let mut completed = 0usize;
    let mut late_successes = 0usize;
    let mut duplicates = 0usize;
    let mut failures = Vec::new();
    let mut drain_until: Option<Instant> = None;

    loop {
        let next = match drain_until {
            Some(deadline) => match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(next) => next,
                Err(_) => break,
            },
            None => rx.recv().await,
        };
        // Closed once the dispatcher and every request task are done.
        let Some(result) = next else { break };
        completed += 1;

        match result.outcome {
            Ok(reservation) => {
                let winner = Winner {
                    label: result.label.clone(),
                    attempt: result.attempt,
                    reservation,
                };
                if slot.offer(winner) {
                    tracing::info!(
                        label = %result.label,
                        attempt = result.attempt,
                        elapsed_ms = result.elapsed.as_millis() as u64,
                        completed,
                        "Reservation won"
                    );
                    if plan.drain.is_zero() {
                        break;
                    }
                    drain_until = Some(Instant::now() + plan.drain);
                } else {
                    late_successes += 1;
                    tracing::debug!(label = %result.label, attempt = result.attempt, "Late success ignored");
                }
            }
            Err(MintError::BenignDuplicate(_)) if slot.is_set() => {
                duplicates += 1;
            }
            Err(e) => {
                if matches!(e, MintError::BenignDuplicate(_)) {
                    duplicates += 1;
                }
                tracing::debug!(
                    label = %result.label,
                    attempt = result.attempt,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    error = %e,
                    "Attempt failed"
                );
                failures.push(AttemptFailure::new(result.label, result.attempt, &e));
            }
        }
    }
    dispatcher.abort();

    let dispatched = dispatched.load(Ordering::Relaxed);
    match slot.get().cloned() {
        Some(winner) => {
            tracing::info!(
                dispatched,
                completed,
                late_successes,
                duplicates,
                failed = failures.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Submission round finished"
            );
            Ok(FanoutOutcome {
                winner,
                dispatched,
                completed,
                late_successes,
                duplicates,
                failures,
            })
        }
        None => Err(MintError::Exhausted(ExhaustedReport::new(failures))),
    }
}

async fn dispatch<G>(
    gateway: Arc<G>,
    submissions: Vec<Submission>,
    copies: u32,
    plan: FanoutPlan,
    slot: Arc<WinnerSlot>,
    dispatched: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<AttemptResult>,
) where
    G: MintGateway + Sync + 'static,
{
    let paced = !plan.pacing.is_burst();
    let mut pacer = Pacer::new(plan.pacing);

    for submission in submissions {
        let request = Arc::new(submission.request);
        for attempt in 1..=copies {
            pacer.tick().await;
            if paced && slot.is_set() {
                tracing::debug!(
                    dispatched = dispatched.load(Ordering::Relaxed),
                    "Winner known, stopping dispatch"
                );
                return;
            }

            let gateway = Arc::clone(&gateway);
            let request = Arc::clone(&request);
            let label = submission.label.clone();
            let tx = tx.clone();
            let timeout = plan.attempt_timeout;
            dispatched.fetch_add(1, Ordering::Relaxed);
            tokio::spawn(async move {
                let started = Instant::now();
                let outcome = submit_once(gateway.as_ref(), &request, timeout).await;
                // Receiver is gone once the round has returned.
                let _ = tx.send(AttemptResult {
                    label,
                    attempt,
                    elapsed: started.elapsed(),
                    outcome,
                });
            });
        }
    }
}

//! Mint Use Case
//!
//! Drives one minting run through the admission state machine:
//! challenge, solve, submit, then sign and broadcast the winning
//! reservation. State changes are published on a watch channel.

use crate::application::config::MintConfig;
use crate::application::request_challenge::RequestChallengeUseCase;
use crate::application::saturate::Submission;
use crate::application::submit_solution::SubmitSolutionUseCase;
use crate::domain::entities::{MintReceipt, MintReply, SignedAuthorization, Solution, Winner};
use crate::domain::repository::{AuthorizationSigner, MintGateway};
use crate::domain::state::AdmissionState;
use crate::error::{MintError, MintResult};
use pow::{SearchControl, SolveChallengeUseCase, SolverConfig};
use std::sync::Arc;
use tokio::sync::watch;

/// Label of a solution solved within the same run
pub const LIVE_LABEL: &str = "live";

/// `live` for a single puzzle, `live-1`, `live-2`, ... otherwise
pub fn live_label(n: u32, puzzles: u32) -> String {
    if puzzles <= 1 {
        LIVE_LABEL.to_string()
    } else {
        format!("{LIVE_LABEL}-{n}")
    }
}

/// Mint Use Case
pub struct MintUseCase<G, K>
where
    G: MintGateway,
    K: AuthorizationSigner,
{
    gateway: Arc<G>,
    signer: Arc<K>,
    config: Arc<MintConfig>,
    challenges: RequestChallengeUseCase<G>,
    submitter: SubmitSolutionUseCase<G>,
    solver: SolveChallengeUseCase,
    state: watch::Sender<AdmissionState>,
}

impl<G, K> MintUseCase<G, K>
where
    G: MintGateway + Sync + 'static,
    K: AuthorizationSigner,
{
    pub fn new(gateway: Arc<G>, signer: Arc<K>, config: Arc<MintConfig>, solver: Arc<SolverConfig>) -> Self {
        let (state, _) = watch::channel(AdmissionState::Idle);
        Self {
            challenges: RequestChallengeUseCase::new(Arc::clone(&gateway), Arc::clone(&config)),
            submitter: SubmitSolutionUseCase::new(Arc::clone(&gateway), Arc::clone(&config)),
            solver: SolveChallengeUseCase::new(solver),
            gateway,
            signer,
            config,
            state,
        }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<AdmissionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AdmissionState {
        *self.state.borrow()
    }

    /// Full run: challenge and solve `puzzles` times, submit every solution
    /// in one round, then sign and broadcast
    pub async fn run(&self, control: SearchControl) -> MintResult<MintReceipt> {
        self.state.send_replace(AdmissionState::Idle);
        let admitted = self.admit(control).await;
        self.finish(admitted).await
    }

    /// Submit stored solutions in one round, then sign and broadcast
    pub async fn run_presolved(&self, solutions: Vec<Solution>) -> MintResult<MintReceipt> {
        self.state.send_replace(AdmissionState::Idle);
        let admitted = self.admit_presolved(solutions).await;
        self.finish(admitted).await
    }

    /// Sign the winning reservation and broadcast it once
    pub async fn complete(&self, winner: Winner) -> MintResult<MintReceipt> {
        let reservation = &winner.reservation;
        let signed_blob = self.signer.sign(&reservation.unsigned_authorization)?;
        let authorization = SignedAuthorization {
            session_id: reservation.session_id.clone(),
            signed_blob,
        };

        let broadcast = match tokio::time::timeout(
            self.config.broadcast_timeout,
            self.gateway.broadcast(&authorization),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(MintError::timeout(self.config.broadcast_timeout)),
        };

        tracing::info!(
            session_id = %reservation.session_id,
            commit_tx_id = %broadcast.commit_tx_id,
            reveals = broadcast.reveal_tx_ids.len(),
            items = reservation.item_count,
            "Broadcast accepted"
        );
        Ok(MintReceipt { winner, broadcast })
    }

    async fn admit(&self, control: SearchControl) -> MintResult<Winner> {
        self.config.validate()?;
        let base = self.config.base_request();
        let puzzles = self.config.puzzles;
        let mut solutions = Vec::with_capacity(puzzles as usize);

        for n in 1..=puzzles {
            let label = live_label(n, puzzles);
            self.transition(AdmissionState::ChallengeRequested)?;
            let challenge = match self.challenges.execute().await? {
                MintReply::Challenge(challenge) => challenge,
                MintReply::Reservation(reservation) => {
                    self.transition(AdmissionState::Won)?;
                    return Ok(Winner {
                        label,
                        attempt: 1,
                        reservation,
                    });
                }
            };

            self.transition(AdmissionState::Solving)?;
            let solved = self
                .solver
                .execute(&challenge, base.identity.puzzle_identity(), control.clone())
                .await?;
            tracing::info!(label = %label, puzzle = n, puzzles, nonce = %solved.nonce, "Puzzle solved");
            solutions.push(Solution::new(label, challenge, &base, solved.nonce));
        }

        self.transition(AdmissionState::Submitting)?;
        let submissions = solutions.iter().map(Submission::from).collect();
        let output = self.submitter.execute(submissions).await?;
        self.transition(AdmissionState::Won)?;
        Ok(output.winner)
    }

    async fn admit_presolved(&self, solutions: Vec<Solution>) -> MintResult<Winner> {
        self.config.validate()?;
        if solutions.is_empty() {
            return Err(MintError::NoSolutions);
        }
        for solution in &solutions {
            let (Some(expired), Some(valid)) = (solution.is_expired(), solution.verify()) else {
                tracing::warn!(label = %solution.label, "Challenge not recorded, submitting unchecked");
                continue;
            };
            if expired {
                tracing::warn!(
                    label = %solution.label,
                    expired_at = ?solution.expires_at(),
                    "Challenge window has probably lapsed"
                );
            }
            if !valid {
                tracing::warn!(label = %solution.label, "Stored nonce does not verify");
            }
        }

        self.transition(AdmissionState::Submitting)?;
        let submissions = solutions
            .iter()
            .map(|solution| Submission {
                label: solution.label.clone(),
                request: self.config.resubmission(&solution.request),
            })
            .collect();
        let output = self.submitter.execute(submissions).await?;
        self.transition(AdmissionState::Won)?;
        Ok(output.winner)
    }

    async fn finish(&self, admitted: MintResult<Winner>) -> MintResult<MintReceipt> {
        let result = match admitted {
            Ok(winner) => self.complete(winner).await,
            Err(e) => {
                if !self.state().is_terminal() {
                    self.state.send_replace(AdmissionState::Failed);
                }
                Err(e)
            }
        };
        if let Err(e) = &result {
            e.log();
        }
        result
    }

    fn transition(&self, next: AdmissionState) -> MintResult<()> {
        let current = self.state();
        current.advance(next)?;
        self.state.send_replace(next);
        tracing::info!(from = %current, to = %next, "Admission state changed");
        Ok(())
    }
}

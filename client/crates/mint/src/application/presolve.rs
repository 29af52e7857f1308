//! Presolve Use Case
//!
//! Solves a challenge ahead of the opening and appends it to the solution
//! log, so the submission can happen later in a separate run.

use crate::application::config::MintConfig;
use crate::application::request_challenge::RequestChallengeUseCase;
use crate::domain::entities::{MintReply, Reservation, Solution};
use crate::domain::repository::{MintGateway, SolutionRepository};
use crate::error::{MintError, MintResult};
use pow::{SearchControl, SolveChallengeUseCase, SolverConfig};
use std::sync::Arc;

/// Output of a presolve run
#[derive(Debug, Clone)]
pub enum PresolveOutcome {
    /// Solved and stored
    Stored(Solution),
    /// The server granted a reservation without a challenge
    Reserved(Reservation),
}

/// Presolve Use Case
pub struct PresolveUseCase<G, S>
where
    G: MintGateway,
    S: SolutionRepository,
{
    challenges: RequestChallengeUseCase<G>,
    store: Arc<S>,
    solver: SolveChallengeUseCase,
    config: Arc<MintConfig>,
}

impl<G, S> PresolveUseCase<G, S>
where
    G: MintGateway + Sync,
    S: SolutionRepository + Sync,
{
    pub fn new(gateway: Arc<G>, store: Arc<S>, config: Arc<MintConfig>, solver: Arc<SolverConfig>) -> Self {
        Self {
            challenges: RequestChallengeUseCase::new(gateway, Arc::clone(&config)),
            store,
            solver: SolveChallengeUseCase::new(solver),
            config,
        }
    }

    pub async fn execute(&self, label: &str, control: SearchControl) -> MintResult<PresolveOutcome> {
        self.config.validate()?;

        let challenge = match self.challenges.execute().await? {
            MintReply::Challenge(challenge) => challenge,
            MintReply::Reservation(reservation) => return Ok(PresolveOutcome::Reserved(reservation)),
        };

        let base = self.config.base_request();
        let solved = self
            .solver
            .execute(&challenge, base.identity.puzzle_identity(), control)
            .await?;

        let expires_at = challenge.expires_at();
        let solution = Solution::new(label, challenge, &base, solved.nonce);
        if solution.verify() != Some(true) {
            return Err(MintError::Solve(pow::PowError::Internal(format!(
                "nonce {} does not verify",
                solved.nonce
            ))));
        }
        self.store.append(&solution).await?;

        tracing::info!(
            label,
            nonce = %solved.nonce,
            attempts = solved.attempts,
            elapsed_ms = solved.elapsed.as_millis() as u64,
            expires_at = %expires_at,
            "Solution stored"
        );
        Ok(PresolveOutcome::Stored(solution))
    }
}

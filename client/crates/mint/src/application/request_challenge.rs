//! Request Challenge Use Case

use crate::application::config::MintConfig;
use crate::domain::entities::MintReply;
use crate::domain::repository::MintGateway;
use crate::error::{MintError, MintResult};
use std::sync::Arc;

/// Request Challenge Use Case
///
/// Asks for a challenge, retrying transient failures. The server may grant
/// a reservation directly, in which case no puzzle is needed.
pub struct RequestChallengeUseCase<G>
where
    G: MintGateway,
{
    gateway: Arc<G>,
    config: Arc<MintConfig>,
}

impl<G> RequestChallengeUseCase<G>
where
    G: MintGateway + Sync,
{
    pub fn new(gateway: Arc<G>, config: Arc<MintConfig>) -> Self {
        Self { gateway, config }
    }

    pub async fn execute(&self) -> MintResult<MintReply> {
        let request = self.config.base_request();
        let attempts = self.config.challenge_retries + 1;

        let mut attempt = 1;
        loop {
            let result =
                match tokio::time::timeout(self.config.challenge_timeout, self.gateway.request_mint(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(MintError::timeout(self.config.challenge_timeout)),
                };

            match result {
                Ok(MintReply::Challenge(challenge)) => {
                    tracing::info!(
                        difficulty = %challenge.difficulty,
                        expected_attempts = challenge.difficulty.expected_attempts(),
                        expires_in_minutes = challenge.expires_in_minutes,
                        "Challenge received"
                    );
                    return Ok(MintReply::Challenge(challenge));
                }
                Ok(MintReply::Reservation(reservation)) => {
                    tracing::info!(session_id = %reservation.session_id, "Reservation granted without a challenge");
                    return Ok(MintReply::Reservation(reservation));
                }
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(attempt, attempts, error = %e, "Challenge request failed, retrying");
                    tokio::time::sleep(self.config.retry_backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

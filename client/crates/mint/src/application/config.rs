//! Application Configuration
//!
//! Configuration for the admission orchestrator.

use std::time::Duration;

use crate::application::strategy::SubmissionStrategy;
use crate::domain::value_objects::{MintIdentity, SubmissionRequest};
use crate::error::{MintError, MintResult};

/// Mint application configuration
#[derive(Debug, Clone)]
pub struct MintConfig {
    pub identity: MintIdentity,
    /// Items requested per mint
    pub quantity: u32,
    /// sat/vB override, also applied to stored solutions
    pub fee_rate: Option<f64>,
    /// Timeout of one challenge request
    pub challenge_timeout: Duration,
    /// Extra attempts for a challenge request after a transient failure
    pub challenge_retries: u32,
    pub retry_backoff: Duration,
    pub broadcast_timeout: Duration,
    pub strategy: SubmissionStrategy,
    /// Keep collecting late results this long after a win
    pub drain_window: Duration,
    /// Challenges solved in a live run before the submission round
    pub puzzles: u32,
}

impl MintConfig {
    pub fn new(identity: MintIdentity) -> Self {
        Self {
            identity,
            quantity: 1,
            fee_rate: None,
            challenge_timeout: Duration::from_secs(10),
            challenge_retries: 2,
            retry_backoff: Duration::from_millis(500),
            broadcast_timeout: Duration::from_secs(10),
            strategy: SubmissionStrategy::default(),
            drain_window: Duration::ZERO,
            puzzles: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_fee_rate(mut self, fee_rate: Option<f64>) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn with_strategy(mut self, strategy: SubmissionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_drain_window(mut self, drain: Duration) -> Self {
        self.drain_window = drain;
        self
    }

    pub fn with_puzzles(mut self, puzzles: u32) -> Self {
        self.puzzles = puzzles;
        self
    }

    /// Request without a nonce, i.e. a challenge request
    pub fn base_request(&self) -> SubmissionRequest {
        SubmissionRequest::challenge_request(self.identity.clone(), self.quantity, self.fee_rate)
    }

    /// A stored request with this run's overrides applied
    ///
    /// The nonce depends only on challenge and identity, so the fee rate can
    /// change without invalidating it.
    pub fn resubmission(&self, stored: &SubmissionRequest) -> SubmissionRequest {
        SubmissionRequest {
            fee_rate: self.fee_rate.or(stored.fee_rate),
            ..stored.clone()
        }
    }

    pub fn validate(&self) -> MintResult<()> {
        if self.quantity == 0 {
            return Err(MintError::Config("quantity must be at least 1".into()));
        }
        if let Some(rate) = self.fee_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(MintError::Config(format!("invalid fee rate: {rate}")));
            }
        }
        if self.puzzles == 0 {
            return Err(MintError::Config("puzzles must be at least 1".into()));
        }
        if self.strategy.requests_per_solution() == 0 {
            return Err(MintError::Config("copies must be at least 1".into()));
        }
        if self.strategy.attempt_timeout().is_zero() || self.challenge_timeout.is_zero() {
            return Err(MintError::Config("timeouts must be non-zero".into()));
        }
        if self.identity.payment_address.is_empty() {
            return Err(MintError::Config("payment address is empty".into()));
        }
        Ok(())
    }
}

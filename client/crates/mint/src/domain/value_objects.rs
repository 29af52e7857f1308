//! Domain Value Objects

use pow::Nonce;

/// Wallet addresses the allocation is requested for
///
/// The payment address doubles as the puzzle identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintIdentity {
    pub payment_address: String,
    pub payment_pubkey: String,
    pub receiving_address: String,
}

impl MintIdentity {
    pub fn new(
        payment_address: impl Into<String>,
        payment_pubkey: impl Into<String>,
        receiving_address: impl Into<String>,
    ) -> Self {
        Self {
            payment_address: payment_address.into(),
            payment_pubkey: payment_pubkey.into(),
            receiving_address: receiving_address.into(),
        }
    }

    /// Identity string hashed into the puzzle
    pub fn puzzle_identity(&self) -> &str {
        &self.payment_address
    }
}

/// Body of a mint request
///
/// Without a nonce it asks for a challenge; with one it is a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub identity: MintIdentity,
    pub quantity: u32,
    /// sat/vB; `None` lets the server choose
    pub fee_rate: Option<f64>,
    pub challenge_nonce: Option<Nonce>,
}

impl SubmissionRequest {
    pub fn challenge_request(identity: MintIdentity, quantity: u32, fee_rate: Option<f64>) -> Self {
        Self {
            identity,
            quantity,
            fee_rate,
            challenge_nonce: None,
        }
    }

    pub fn with_nonce(&self, nonce: Nonce) -> Self {
        Self {
            challenge_nonce: Some(nonce),
            ..self.clone()
        }
    }

    pub fn is_submission(&self) -> bool {
        self.challenge_nonce.is_some()
    }
}

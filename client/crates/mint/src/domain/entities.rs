//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::SessionId;
use pow::{Challenge, Nonce};

use crate::domain::value_objects::SubmissionRequest;

/// A solved challenge, ready to submit
///
/// Immutable once created; the only entity written to the solution log.
/// Entries replayed from a log that did not record the challenge carry
/// `None`, and their validity is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub label: String,
    pub challenge: Option<Challenge>,
    /// The submission body, nonce included
    pub request: SubmissionRequest,
    pub solved_at: DateTime<Utc>,
}

impl Solution {
    pub fn new(label: impl Into<String>, challenge: Challenge, base: &SubmissionRequest, nonce: Nonce) -> Self {
        Self {
            label: label.into(),
            challenge: Some(challenge),
            request: base.with_nonce(nonce),
            solved_at: Utc::now(),
        }
    }

    pub fn nonce(&self) -> Option<Nonce> {
        self.request.challenge_nonce
    }

    /// Recompute the puzzle to check the stored nonce
    ///
    /// `None` when the challenge is unknown.
    pub fn verify(&self) -> Option<bool> {
        let challenge = self.challenge.as_ref()?;
        Some(self.nonce().is_some_and(|nonce| {
            pow::verify(
                &challenge.value,
                self.request.identity.puzzle_identity(),
                nonce,
                challenge.difficulty,
            )
        }))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.challenge.as_ref().map(Challenge::expires_at)
    }

    pub fn is_expired(&self) -> Option<bool> {
        self.challenge.as_ref().map(Challenge::is_expired)
    }
}

/// An allocation granted by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub session_id: SessionId,
    /// Base64 PSBT to sign
    pub unsigned_authorization: String,
    pub item_count: u32,
    pub total_cost: Option<u64>,
}

/// Successful reply to a mint request
#[derive(Debug, Clone, PartialEq)]
pub enum MintReply {
    Challenge(Challenge),
    Reservation(Reservation),
}

/// The reservation that won a submission round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub label: String,
    pub attempt: u32,
    pub reservation: Reservation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    pub session_id: SessionId,
    pub signed_blob: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MempoolUrls {
    pub commit: String,
    pub reveals: Vec<String>,
}

/// Result of the broadcast call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReceipt {
    pub commit_tx_id: String,
    pub reveal_tx_ids: Vec<String>,
    pub mempool_urls: Option<MempoolUrls>,
    pub ordinals_urls: Vec<String>,
}

/// Final outcome of a minting run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub winner: Winner,
    pub broadcast: BroadcastReceipt,
}

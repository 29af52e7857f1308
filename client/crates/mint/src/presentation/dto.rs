//! Wire DTOs
//!
//! JSON bodies exchanged with the allocation service and the on-disk
//! solution log format.

use chrono::{DateTime, TimeZone, Utc};
use kernel::id::SessionId;
use pow::{Challenge, Difficulty, Nonce};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{BroadcastReceipt, MempoolUrls, MintReply, Reservation, Solution};
use crate::domain::value_objects::{MintIdentity, SubmissionRequest};
use crate::error::{MintError, MintResult};

/// Assumed validity window when the server omits it
pub const DEFAULT_EXPIRES_IN_MINUTES: u32 = 5;

/// Mint request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MintRequestDto {
    #[serde(alias = "payment_identity")]
    pub payment_address: String,
    pub payment_pubkey: String,
    #[serde(alias = "receiving_identity")]
    pub receiving_address: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_nonce: Option<String>,
}

impl From<&SubmissionRequest> for MintRequestDto {
    fn from(request: &SubmissionRequest) -> Self {
        Self {
            payment_address: request.identity.payment_address.clone(),
            payment_pubkey: request.identity.payment_pubkey.clone(),
            receiving_address: request.identity.receiving_address.clone(),
            quantity: request.quantity,
            fee_rate: request.fee_rate,
            challenge_nonce: request.challenge_nonce.map(|n| n.to_string()),
        }
    }
}

impl MintRequestDto {
    pub fn into_domain(self) -> MintResult<SubmissionRequest> {
        let challenge_nonce = self
            .challenge_nonce
            .as_deref()
            .map(str::parse::<Nonce>)
            .transpose()
            .map_err(|e| MintError::Storage(format!("invalid challenge_nonce: {e}")))?;
        Ok(SubmissionRequest {
            identity: MintIdentity::new(self.payment_address, self.payment_pubkey, self.receiving_address),
            quantity: self.quantity,
            fee_rate: self.fee_rate,
            challenge_nonce,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostsDto {
    pub total_cost: Option<f64>,
}

/// Mint response body
///
/// Challenge, reservation and error replies share one shape; every field
/// is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MintResponseDto {
    pub challenge: Option<String>,
    pub difficulty: Option<u32>,
    pub expires_in_minutes: Option<u32>,
    pub challenge_required: Option<bool>,
    pub success: Option<bool>,
    pub session_id: Option<String>,
    pub commit_psbt: Option<String>,
    pub ordinal_count: Option<u32>,
    pub costs: Option<CostsDto>,
    pub error: Option<String>,
}

impl MintResponseDto {
    /// Non-2xx replies flagged with `challenge_required` or `success` are normal replies
    pub fn is_normal_reply(&self) -> bool {
        self.challenge_required == Some(true) || self.success == Some(true)
    }

    pub fn into_reply(self) -> MintResult<MintReply> {
        if let Some(psbt) = self.commit_psbt {
            let session_id = self
                .session_id
                .ok_or_else(|| MintError::InvalidResponse("reservation without session_id".into()))?;
            return Ok(MintReply::Reservation(Reservation {
                session_id: SessionId::new(session_id),
                unsigned_authorization: psbt,
                item_count: self.ordinal_count.unwrap_or(0),
                total_cost: self.costs.and_then(|c| c.total_cost).map(|c| c.round() as u64),
            }));
        }
        if let Some(value) = self.challenge {
            let zeros = self.difficulty.unwrap_or(Difficulty::DEFAULT.zeros());
            let difficulty = Difficulty::new(zeros)
                .ok_or_else(|| MintError::InvalidResponse(format!("difficulty {zeros} out of range")))?;
            let expires = self.expires_in_minutes.unwrap_or(DEFAULT_EXPIRES_IN_MINUTES);
            return Ok(MintReply::Challenge(Challenge::new(value, difficulty, expires)));
        }
        Err(MintError::InvalidResponse(match self.error {
            Some(error) => format!("unexpected reply: {error}"),
            None => "neither challenge nor reservation".into(),
        }))
    }
}

/// Broadcast request body
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastRequestDto {
    pub session_id: String,
    pub signed_psbt_base64: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MempoolUrlsDto {
    pub commit: String,
    #[serde(default)]
    pub reveals: Vec<String>,
}

/// Broadcast response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastResponseDto {
    pub commit_tx_id: Option<String>,
    #[serde(default)]
    pub reveal_tx_ids: Vec<String>,
    pub mempool_urls: Option<MempoolUrlsDto>,
    #[serde(default)]
    pub ordinals_urls: Vec<String>,
    pub success: Option<bool>,
    pub error: Option<String>,
}

impl BroadcastResponseDto {
    pub fn into_receipt(self) -> MintResult<BroadcastReceipt> {
        let commit_tx_id = self
            .commit_tx_id
            .ok_or_else(|| MintError::InvalidResponse("broadcast reply without commit_tx_id".into()))?;
        Ok(BroadcastReceipt {
            commit_tx_id,
            reveal_tx_ids: self.reveal_tx_ids,
            mempool_urls: self.mempool_urls.map(|m| MempoolUrls {
                commit: m.commit,
                reveals: m.reveals,
            }),
            ordinals_urls: self.ordinals_urls,
        })
    }
}

/// Challenge as stored alongside its solution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredChallengeDto {
    pub challenge: String,
    pub difficulty: u32,
    pub expires_in_minutes: u32,
    /// Unix milliseconds
    pub issued_at: i64,
}

/// One entry of the solution log
///
/// `challenge` is optional: logs that only record `{label, payload,
/// timestamp}` are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSolutionDto {
    pub label: String,
    pub payload: MintRequestDto,
    /// Unix milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<StoredChallengeDto>,
}

/// Solution log file: `{ "solutions": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolutionLogDto {
    #[serde(default)]
    pub solutions: Vec<StoredSolutionDto>,
}

impl From<&Challenge> for StoredChallengeDto {
    fn from(challenge: &Challenge) -> Self {
        Self {
            challenge: challenge.value.clone(),
            difficulty: challenge.difficulty.zeros(),
            expires_in_minutes: challenge.expires_in_minutes,
            issued_at: challenge.issued_at.timestamp_millis(),
        }
    }
}

impl StoredChallengeDto {
    fn into_domain(self, label: &str) -> MintResult<Challenge> {
        let difficulty = Difficulty::new(self.difficulty).ok_or_else(|| {
            MintError::Storage(format!("solution {label}: difficulty {} out of range", self.difficulty))
        })?;
        Ok(Challenge::issued_at(
            self.challenge,
            difficulty,
            self.expires_in_minutes,
            from_millis(self.issued_at)?,
        ))
    }
}

impl From<&Solution> for StoredSolutionDto {
    fn from(solution: &Solution) -> Self {
        Self {
            label: solution.label.clone(),
            payload: MintRequestDto::from(&solution.request),
            timestamp: solution.solved_at.timestamp_millis(),
            challenge: solution.challenge.as_ref().map(StoredChallengeDto::from),
        }
    }
}

impl StoredSolutionDto {
    pub fn into_domain(self) -> MintResult<Solution> {
        let challenge = self
            .challenge
            .map(|c| c.into_domain(&self.label))
            .transpose()?;
        let request = self.payload.into_domain()?;
        if request.challenge_nonce.is_none() {
            return Err(MintError::Storage(format!("solution {} has no challenge_nonce", self.label)));
        }
        Ok(Solution {
            challenge,
            request,
            solved_at: from_millis(self.timestamp)?,
            label: self.label,
        })
    }
}

fn from_millis(ms: i64) -> MintResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| MintError::Storage(format!("invalid timestamp {ms}")))
}

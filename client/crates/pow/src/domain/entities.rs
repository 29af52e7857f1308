//! Domain Entities
//!
//! Core entities for the puzzle domain.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_objects::Difficulty;

/// Challenge entity - a proof-of-work puzzle issued by the allocation service
///
/// The validity window is enforced by the server. `is_expired` is a
/// best-effort local estimate based on when the challenge was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub value: String,
    pub difficulty: Difficulty,
    pub expires_in_minutes: u32,
    pub issued_at: DateTime<Utc>,
}

impl Challenge {
    /// Create a challenge received just now
    pub fn new(value: impl Into<String>, difficulty: Difficulty, expires_in_minutes: u32) -> Self {
        Self::issued_at(value, difficulty, expires_in_minutes, Utc::now())
    }

    /// Create a challenge with a known receive time (e.g. reloaded from a log)
    pub fn issued_at(
        value: impl Into<String>,
        difficulty: Difficulty,
        expires_in_minutes: u32,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            value: value.into(),
            difficulty,
            expires_in_minutes,
            issued_at,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::minutes(i64::from(self.expires_in_minutes))
    }

    /// Check if the challenge has (probably) expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }
}

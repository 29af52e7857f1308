//! Admission state machine

use std::fmt;

use crate::error::{MintError, MintResult};

/// Phase of one minting run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmissionState {
    Idle,
    ChallengeRequested,
    Solving,
    Submitting,
    Won,
    Failed,
}

impl AdmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AdmissionState::Won | AdmissionState::Failed)
    }

    pub fn can_transition_to(&self, next: AdmissionState) -> bool {
        use AdmissionState::*;
        matches!(
            (self, next),
            (Idle, ChallengeRequested)
                | (Idle, Submitting)
                | (ChallengeRequested, Solving)
                | (ChallengeRequested, Won)
                | (Solving, ChallengeRequested)
                | (Solving, Submitting)
                | (Submitting, Won)
        ) || (!self.is_terminal() && next == Failed)
    }

    /// Validate and return the next state
    pub fn advance(self, next: AdmissionState) -> MintResult<AdmissionState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(MintError::InvalidTransition { from: self, to: next })
        }
    }
}

impl fmt::Display for AdmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdmissionState::Idle => "idle",
            AdmissionState::ChallengeRequested => "challenge_requested",
            AdmissionState::Solving => "solving",
            AdmissionState::Submitting => "submitting",
            AdmissionState::Won => "won",
            AdmissionState::Failed => "failed",
        };
        f.write_str(s)
    }
}

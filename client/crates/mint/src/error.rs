//! Mint Error Types
//!
//! Orchestrator errors that integrate with the unified
//! `kernel::error::AppError` system.

use std::fmt;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use pow::PowError;
use signer::SignerError;
use thiserror::Error;

use crate::domain::state::AdmissionState;

/// Mint-specific result type alias
pub type MintResult<T> = Result<T, MintError>;

/// Mint-specific error variants
#[derive(Debug, Error)]
pub enum MintError {
    /// Transport failure or per-request timeout
    #[error("Network error: {detail}")]
    Network { timed_out: bool, detail: String },

    /// Server answered with an error
    #[error("Rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Server reports the request was already processed
    #[error("Duplicate request: {0}")]
    BenignDuplicate(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Every submission attempt failed
    #[error("All submission attempts failed: {0}")]
    Exhausted(ExhaustedReport),

    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    #[error("Solving failed: {0}")]
    Solve(#[from] PowError),

    /// Solution log could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Nothing to submit
    #[error("No solutions available")]
    NoSolutions,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: AdmissionState,
        to: AdmissionState,
    },
}

impl MintError {
    pub fn timeout(after: std::time::Duration) -> Self {
        MintError::Network {
            timed_out: true,
            detail: format!("timed out after {}ms", after.as_millis()),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MintError::Network { timed_out: true, .. } => ErrorKind::Timeout,
            MintError::Network { .. } => ErrorKind::Network,
            MintError::Rejected { .. } => ErrorKind::Rejected,
            MintError::BenignDuplicate(_) => ErrorKind::Duplicate,
            MintError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            MintError::Exhausted(_) => ErrorKind::Exhausted,
            MintError::Signing(e) => e.kind(),
            MintError::Solve(e) => e.kind(),
            MintError::Storage(_) | MintError::NoSolutions => ErrorKind::Storage,
            MintError::Config(_) => ErrorKind::Config,
            MintError::InvalidTransition { .. } => ErrorKind::Internal,
        }
    }

    /// Worth another attempt: transport failures and server-side errors
    pub fn is_retryable(&self) -> bool {
        match self {
            MintError::Rejected { status, .. } => *status >= 500 || *status == 429,
            _ => self.kind().is_retryable(),
        }
    }

    /// Classification used in attempt reports
    pub fn failure_class(&self) -> FailureClass {
        match self {
            MintError::Network { timed_out: true, .. } => FailureClass::Timeout,
            MintError::Network { .. } => FailureClass::Network,
            MintError::BenignDuplicate(_) => FailureClass::Duplicate,
            MintError::InvalidResponse(_) => FailureClass::InvalidResponse,
            _ => FailureClass::Rejected,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            MintError::Exhausted(report) => {
                tracing::error!(
                    attempts = report.total(),
                    timeouts = report.timeouts,
                    network = report.network,
                    rejected = report.rejected,
                    duplicates = report.duplicates,
                    diagnosis = %report.diagnosis(),
                    "All submission attempts failed"
                );
                for failure in &report.failures {
                    tracing::debug!(attempt = %failure.id(), class = ?failure.class, detail = %failure.detail, "Attempt failed");
                }
            }
            MintError::Signing(e) => e.log(),
            MintError::Solve(e) => e.log(),
            MintError::BenignDuplicate(msg) => {
                tracing::warn!(message = %msg, "Server reports a duplicate; the mint may already have succeeded");
            }
            MintError::InvalidTransition { .. } => {
                tracing::error!(error = %self, "Orchestrator bug");
            }
            _ => {
                tracing::warn!(error = %self, "Mint error");
            }
        }
    }
}

impl From<MintError> for AppError {
    fn from(err: MintError) -> Self {
        let kind = err.kind();
        let app = AppError::new(kind, err.to_string());
        match &err {
            MintError::BenignDuplicate(_) => app.with_action("Check the wallet history before retrying"),
            MintError::Exhausted(report) if report.diagnosis() == Diagnosis::NoResponse => {
                app.with_action("Check network connectivity or raise the attempt timeout")
            }
            MintError::NoSolutions => app.with_action("Run `minter presolve` first"),
            _ => app,
        }
    }
}

impl From<std::io::Error> for MintError {
    fn from(err: std::io::Error) -> Self {
        MintError::Storage(err.to_string())
    }
}

/// Outcome class of one failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Timeout,
    Network,
    Rejected,
    Duplicate,
    InvalidResponse,
}

/// One failed submission attempt
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    pub label: String,
    /// 1-based, per solution
    pub attempt: u32,
    pub class: FailureClass,
    pub detail: String,
}

impl AttemptFailure {
    pub fn new(label: impl Into<String>, attempt: u32, error: &MintError) -> Self {
        Self {
            label: label.into(),
            attempt,
            class: error.failure_class(),
            detail: error.to_string(),
        }
    }

    /// `label#attempt`
    pub fn id(&self) -> String {
        format!("{}#{}", self.label, self.attempt)
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id(), self.detail)
    }
}

/// What went wrong across all attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    /// Every attempt got an answer, and every answer was a refusal
    AllRejected,
    /// No attempt got an answer
    NoResponse,
    Mixed,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Diagnosis::AllRejected => "all rejected",
            Diagnosis::NoResponse => "no response",
            Diagnosis::Mixed => "mixed",
        };
        f.write_str(s)
    }
}

/// Every failed attempt, in completion order
#[derive(Debug, Clone, Default)]
pub struct ExhaustedReport {
    pub failures: Vec<AttemptFailure>,
    pub timeouts: usize,
    pub network: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

impl ExhaustedReport {
    pub fn new(failures: Vec<AttemptFailure>) -> Self {
        let mut report = Self::default();
        for failure in &failures {
            match failure.class {
                FailureClass::Timeout => report.timeouts += 1,
                FailureClass::Network => report.network += 1,
                FailureClass::Rejected => report.rejected += 1,
                FailureClass::Duplicate => report.duplicates += 1,
                FailureClass::InvalidResponse => report.invalid += 1,
            }
        }
        report.failures = failures;
        report
    }

    pub fn total(&self) -> usize {
        self.failures.len()
    }

    pub fn last(&self) -> Option<&AttemptFailure> {
        self.failures.last()
    }

    pub fn diagnosis(&self) -> Diagnosis {
        let unanswered = self.timeouts + self.network;
        if unanswered == self.total() {
            Diagnosis::NoResponse
        } else if unanswered == 0 && self.invalid == 0 {
            Diagnosis::AllRejected
        } else {
            Diagnosis::Mixed
        }
    }
}

impl fmt::Display for ExhaustedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempts ({}; {} timeouts, {} network, {} rejected, {} duplicates)",
            self.total(),
            self.diagnosis(),
            self.timeouts,
            self.network,
            self.rejected,
            self.duplicates
        )?;
        if let Some(last) = self.last() {
            write!(f, ", last: {last}")?;
        }
        Ok(())
    }
}

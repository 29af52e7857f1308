//! PoW Error Types
//!
//! Solver errors that integrate with the unified `kernel::error::AppError`
//! system.

use std::time::Duration;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// PoW-specific result type alias
pub type PowResult<T> = Result<T, PowError>;

/// PoW-specific error variants
#[derive(Debug, Error)]
pub enum PowError {
    /// Search stopped by its caller
    #[error("Search cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    /// Search ran past its time budget
    #[error("Search budget of {budget:?} exhausted after {attempts} attempts")]
    BudgetExhausted { budget: Duration, attempts: u64 },

    /// Difficulty outside 0..=64
    #[error("Invalid difficulty: {0} (expected 0..=64)")]
    InvalidDifficulty(u32),

    /// Solver configuration rejected
    #[error("Invalid solver config: {0}")]
    InvalidConfig(String),

    /// Worker task failed to complete
    #[error("Solver task failed: {0}")]
    Internal(String),
}

impl PowError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PowError::Cancelled { .. } => ErrorKind::Cancelled,
            PowError::BudgetExhausted { .. } => ErrorKind::Timeout,
            PowError::InvalidDifficulty(_) => ErrorKind::InvalidResponse,
            PowError::InvalidConfig(_) => ErrorKind::Config,
            PowError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            PowError::Internal(msg) => {
                tracing::error!(message = %msg, "Solver internal error");
            }
            PowError::BudgetExhausted { budget, attempts } => {
                tracing::warn!(budget_ms = budget.as_millis() as u64, attempts, "Solver budget exhausted");
            }
            _ => {
                tracing::debug!(error = %self, "Solver error");
            }
        }
    }
}

impl From<PowError> for AppError {
    fn from(err: PowError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

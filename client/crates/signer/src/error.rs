//! Signer Error Types

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Signer result type alias
pub type SignerResult<T> = Result<T, SignerError>;

/// Signing failures
///
/// Input indexes refer to the position in the PSBT.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Not base64, or not a PSBT
    #[error("Malformed authorization blob: {0}")]
    MalformedBlob(String),

    /// Neither `witness_utxo` nor a matching `non_witness_utxo` output
    #[error("Input {index}: previous output missing")]
    MissingPrevout { index: usize },

    /// The previous output (or internal key) does not belong to the signing key
    #[error("Input {index}: previous output is not spendable by the signing key")]
    KeyMismatch { index: usize },

    /// Script type other than P2TR key path or P2WPKH
    #[error("Input {index}: unsupported script type")]
    UnsupportedScript { index: usize },

    /// Private key could not be parsed
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Tweak out of range for the curve
    #[error("Failed to apply taproot tweak")]
    Tweak,

    #[error("Input {index}: sighash computation failed: {detail}")]
    Sighash { index: usize, detail: String },

    /// Finalizer found an input without a signature
    #[error("Input {index}: no signature to finalize")]
    MissingSignature { index: usize },
}

impl SignerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignerError::InvalidKey(_) => ErrorKind::Config,
            _ => ErrorKind::Signing,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            SignerError::MalformedBlob(_) | SignerError::Sighash { .. } => {
                tracing::error!(error = %self, "Authorization signing failed");
            }
            _ => {
                tracing::warn!(error = %self, "Authorization signing rejected");
            }
        }
    }
}

impl From<SignerError> for AppError {
    fn from(err: SignerError) -> Self {
        let kind = err.kind();
        AppError::new(kind, err.to_string())
    }
}

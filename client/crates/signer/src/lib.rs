//! Authorization signer
//!
//! Signs the PSBT returned with a reservation:
//! - inputs with `tap_internal_key` use the tweaked taproot key path (Schnorr, `SIGHASH_DEFAULT`)
//! - all other inputs use P2WPKH (ECDSA, `SIGHASH_ALL`)
//!
//! Inputs are finalized only after every input has been signed.

pub mod application;
pub mod domain;
pub mod error;

pub use application::sign_authorization::{finalize_psbt, sign, sign_psbt};
pub use domain::key::SigningKey;
pub use domain::spend::SpendPath;
pub use error::{SignerError, SignerResult};

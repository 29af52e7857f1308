//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, BIP-340 tagged hashes, Base64)
//! - HTTP client construction (headers, timeouts, connection warm-up)
//! - Secret strings (zeroized key material)
//! - Request pacing and wall-clock scheduling

pub mod crypto;
pub mod http;
pub mod pacing;
pub mod secret;

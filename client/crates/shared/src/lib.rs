//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the minting client's vocabulary:
//! - Common error kinds, the application error type and result aliases
//! - Typed identifiers handed out by the allocation service
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

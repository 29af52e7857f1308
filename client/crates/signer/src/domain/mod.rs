//! Domain Layer - Keys and spend paths

pub mod key;
pub mod spend;

//! Domain Layer - Puzzle logic and entities
//!
//! This layer contains:
//! - Domain entities (Challenge)
//! - Domain value objects (Difficulty, Nonce)
//! - Domain services (digest and difficulty predicate)
//! - Nonce search (sequential, cancellable, parallel)

pub mod entities;
pub mod search;
pub mod services;
pub mod value_objects;

//! Domain Layer - Admission entities, state and interfaces
//!
//! This layer contains:
//! - Domain entities (Solution, Reservation, Winner, receipts)
//! - Domain value objects (MintIdentity, SubmissionRequest)
//! - The admission state machine
//! - Repository traits (gateway, solution log, signer)

pub mod entities;
pub mod repository;
pub mod state;
pub mod value_objects;

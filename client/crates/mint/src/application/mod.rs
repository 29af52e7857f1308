//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod mint;
pub mod presolve;
pub mod request_challenge;
pub mod saturate;
pub mod strategy;
pub mod submit_solution;

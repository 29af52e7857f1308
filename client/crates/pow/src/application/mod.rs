//! Application Layer - Use Cases
//!
//! Runs the domain search off the async runtime.

pub mod benchmark;
pub mod config;
pub mod solve_challenge;

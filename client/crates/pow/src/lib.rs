//! Admission puzzle solver
//!
//! Clean Architecture structure:
//! - `domain/` - Challenge, difficulty predicate and nonce search
//! - `application/` - Solver configuration and use cases
//!
//! A solution for challenge `c` and identity `a` is the smallest counter `n`
//! such that `hex(sha256(c ‖ a ‖ decimal(n)))` starts with `difficulty`
//! `'0'` characters.

pub mod application;
pub mod domain;
pub mod error;

// Re-exports for convenience
pub use application::benchmark::{BenchmarkReport, run_benchmark};
pub use application::config::SolverConfig;
pub use application::solve_challenge::{SolveChallengeOutput, SolveChallengeUseCase};
pub use domain::entities::Challenge;
pub use domain::search::{SearchControl, SearchProgress, solve, solve_parallel, solve_with};
pub use domain::services::{digest, leading_zero_nibbles, meets_difficulty, verify};
pub use domain::value_objects::{Difficulty, Nonce};
pub use error::{PowError, PowResult};

#[cfg(test)]
mod tests;

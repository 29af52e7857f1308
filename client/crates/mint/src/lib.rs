//! Admission orchestrator
//!
//! Clean Architecture structure:
//! - `domain/` - Solutions, reservations, the admission state machine, repository traits
//! - `application/` - Strategies, saturated submission and use cases
//! - `infra/` - HTTP gateway and JSON solution log
//! - `presentation/` - Wire DTOs
//!
//! ## Flow
//! `Idle → ChallengeRequested → Solving → Submitting → Won | Failed`.
//! Stored solutions resume directly at `Submitting`. The winning
//! reservation is signed and broadcast exactly once.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::MintConfig;
pub use application::mint::MintUseCase;
pub use application::presolve::{PresolveOutcome, PresolveUseCase};
pub use application::saturate::{FanoutOutcome, FanoutPlan, Submission, WinnerSlot, saturate};
pub use application::strategy::SubmissionStrategy;
pub use domain::entities::{BroadcastReceipt, MintReceipt, Reservation, Solution, Winner};
pub use domain::state::AdmissionState;
pub use domain::value_objects::{MintIdentity, SubmissionRequest};
pub use error::{Diagnosis, ExhaustedReport, MintError, MintResult};
pub use infra::http::{GatewayConfig, HttpMintGateway};
pub use infra::json_file::JsonSolutionStore;

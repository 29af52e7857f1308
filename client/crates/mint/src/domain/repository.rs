//! Repository Traits
//!
//! Interfaces to the allocation service, the solution log and the wallet
//! key. Implementations are in the infrastructure layer.

use signer::{SignerResult, SigningKey};

use crate::domain::entities::{BroadcastReceipt, MintReply, SignedAuthorization, Solution};
use crate::domain::value_objects::SubmissionRequest;
use crate::error::MintResult;

/// Allocation service
#[trait_variant::make(MintGateway: Send)]
pub trait LocalMintGateway {
    /// POST a mint request; returns a challenge or a reservation
    async fn request_mint(&self, request: &SubmissionRequest) -> MintResult<MintReply>;

    /// POST the signed authorization
    async fn broadcast(&self, authorization: &SignedAuthorization) -> MintResult<BroadcastReceipt>;
}

/// Durable, append-only solution log
#[trait_variant::make(SolutionRepository: Send)]
pub trait LocalSolutionRepository {
    async fn append(&self, solution: &Solution) -> MintResult<()>;

    /// All stored solutions, oldest first
    async fn load_all(&self) -> MintResult<Vec<Solution>>;
}

/// Produces the signed authorization for a reservation
pub trait AuthorizationSigner: Send + Sync {
    fn sign(&self, unsigned_b64: &str) -> SignerResult<String>;
}

impl AuthorizationSigner for SigningKey {
    fn sign(&self, unsigned_b64: &str) -> SignerResult<String> {
        signer::sign(unsigned_b64, self)
    }
}

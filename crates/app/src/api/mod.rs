//! Backend REST API
//!
//! The backend owns every contract, signature and signing token. The public
//! endpoints are reached with an opaque signing token and no credentials;
//! the company endpoints need a bearer token.

mod client;
mod errors;
pub(crate) mod records;
mod retry;

use async_trait::async_trait;
use countersign::{contracts::PublicContract, signatures::ResourceId};
use mockall::automock;

pub use client::ApiClient;
pub use errors::{ApiError, GENERIC_FAILURE_MESSAGE};
pub use records::{SignReceipt, SignRequest, SigningEnabled, SigningStatusReport};
pub use retry::RetryPolicy;

/// Unauthenticated endpoints used by the public signing page.
#[automock]
#[async_trait]
pub trait PublicContractsApi: Send + Sync {
    /// Load a contract by its signing token.
    async fn get_contract(&self, token: &str) -> Result<PublicContract, ApiError>;

    /// Append a signature. Never retried.
    async fn sign(&self, token: &str, request: SignRequest) -> Result<SignReceipt, ApiError>;
}

/// Bearer-authenticated endpoints used by company admins.
#[automock]
#[async_trait]
pub trait ContractSigningApi: Send + Sync {
    /// Turn public signing on and mint a signing URL.
    async fn enable_signing(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
        required_signers: &[String],
    ) -> Result<SigningEnabled, ApiError>;

    /// Turn public signing off.
    async fn disable_signing(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
    ) -> Result<(), ApiError>;

    /// Current signing state of a contract.
    async fn signing_status(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
    ) -> Result<SigningStatusReport, ApiError>;
}

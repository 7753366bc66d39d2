//! Contracts
//!
//! Client-side views of a contract as returned by the backend. Any of the
//! signer lists may be missing or `null` in a payload; they deserialize as
//! empty so status derivation degrades instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    signatures::{ResourceId, Signature, has_signed},
    status::{SigningProgress, SigningStatus, derive_status},
};

/// Deserialize a field that the backend may send as `null`, falling back to
/// the type's default. Pair with `#[serde(default)]` for absent fields.
///
/// # Errors
///
/// Propagates errors for values that are present but malformed.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Contract loaded through its public signing token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicContract {
    /// Backend identifier.
    pub id: ResourceId,

    /// Contract title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Candidate display name.
    #[serde(default)]
    pub candidate: Option<String>,

    /// Company display name.
    #[serde(default)]
    pub company: Option<String>,

    /// Status reported by the server. May lag behind `signatures`.
    #[serde(default)]
    pub signing_status: Option<String>,

    /// Progress reported by the server. Informational only.
    #[serde(default)]
    pub signing_progress: Option<f64>,

    /// Emails that must sign, in order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_signers: Vec<String>,

    /// Remaining signers reported by the server. Informational only.
    #[serde(default, deserialize_with = "null_as_default")]
    pub remaining_signers: Vec<String>,

    /// Contract body with template variables already substituted.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rendered_html: String,

    /// Recorded signatures.
    #[serde(default, deserialize_with = "null_as_default")]
    pub signatures: Vec<Signature>,
}

impl PublicContract {
    /// A contract reachable through a public token accepts signatures unless
    /// the server explicitly reports signing as disabled.
    #[must_use]
    pub fn public_signing_enabled(&self) -> bool {
        self.server_status() != Some(SigningStatus::SigningDisabled)
    }

    /// Parsed server status, if recognised.
    #[must_use]
    pub fn server_status(&self) -> Option<SigningStatus> {
        self.signing_status.as_deref().and_then(SigningStatus::parse)
    }

    /// Snapshot of the signing state of this contract.
    #[must_use]
    pub fn snapshot(&self) -> SigningSnapshot {
        SigningSnapshot {
            public_signing_enabled: self.public_signing_enabled(),
            required_signers: self.required_signers.clone(),
            signatures: self.signatures.clone(),
        }
    }

    /// Derived signing state of this contract.
    #[must_use]
    pub fn derived(&self) -> SigningProgress {
        derive_status(
            &self.required_signers,
            &self.signatures,
            self.public_signing_enabled(),
        )
    }
}

/// Inputs to [`derive_status`] for one contract at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigningSnapshot {
    /// Whether the public link accepts signatures.
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_signing_enabled: bool,

    /// Emails that must sign.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_signers: Vec<String>,

    /// Signatures recorded so far.
    #[serde(default, deserialize_with = "null_as_default")]
    pub signatures: Vec<Signature>,
}

impl SigningSnapshot {
    /// Derived signing state.
    #[must_use]
    pub fn derived(&self) -> SigningProgress {
        derive_status(
            &self.required_signers,
            &self.signatures,
            self.public_signing_enabled,
        )
    }

    /// Whether `email` already has a signature in this snapshot.
    #[must_use]
    pub fn has_signed(&self, email: &str) -> bool {
        has_signed(&self.signatures, email)
    }
}

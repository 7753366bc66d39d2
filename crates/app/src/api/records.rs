//! Wire records exchanged with the backend.

use countersign::{
    contracts::{PublicContract, SigningSnapshot, null_as_default},
    signatures::Signature,
};
use serde::{Deserialize, Serialize};

/// `{ "data": ... }` success envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: T,
}

/// Error body. The backend uses `error`; `message` and `errors` also appear.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    message: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .or_else(|| (!self.errors.is_empty()).then(|| self.errors.join(", ")))
            .filter(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublicContractData {
    pub(crate) contract: PublicContract,
}

/// Body of `POST /public/contracts/{token}/sign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    /// Signer's full name.
    pub signer_name: String,

    /// Signer's email as entered.
    pub signer_email: String,

    /// PNG data URL of the drawn signature.
    pub signature_data: String,
}

/// Result of a successful sign request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignReceipt {
    /// Backend's view of completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fully_signed: bool,

    /// Required signers still outstanding.
    #[serde(default, deserialize_with = "null_as_default")]
    pub remaining_signers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnableSigningRequest<'a> {
    pub(crate) required_signers: &'a [String],
}

/// Result of enabling public signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningEnabled {
    /// Public URL signers open.
    pub signing_url: String,

    /// Token embedded in `signing_url`.
    #[serde(default)]
    pub signing_token: Option<String>,

    /// Signer list as stored by the server. Empty when not echoed back.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_signers: Vec<String>,
}

/// Authenticated signing status of a contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigningStatusReport {
    /// Whether the public link accepts signatures.
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_signing_enabled: bool,

    /// Status string computed by the server. May lag behind `signatures`.
    #[serde(default)]
    pub signing_status: Option<String>,

    /// Emails that must sign.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_signers: Vec<String>,

    /// Signatures recorded so far.
    #[serde(default, deserialize_with = "null_as_default")]
    pub signatures: Vec<Signature>,

    /// Public signing link, while enabled.
    #[serde(default)]
    pub signing_url: Option<String>,
}

impl SigningStatusReport {
    /// Inputs for status derivation.
    #[must_use]
    pub fn snapshot(&self) -> SigningSnapshot {
        SigningSnapshot {
            public_signing_enabled: self.public_signing_enabled,
            required_signers: self.required_signers.clone(),
            signatures: self.signatures.clone(),
        }
    }
}

//! Signatures

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

use crate::signers::emails_match;

/// Identifier assigned by the backend. Accepts JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(number) => Self(number.to_string()),
            RawId::Text(text) => Self(text),
        })
    }
}

/// A recorded signature. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Backend identifier, or `local:{email}` before the server confirms it.
    pub id: ResourceId,

    /// Name as typed by the signer.
    pub signer_name: String,

    /// Email as typed by the signer.
    pub signer_email: String,

    /// When the signature was recorded.
    pub signed_at: Timestamp,
}

impl Signature {
    /// Whether this signature was made by `email`, ignoring case.
    #[must_use]
    pub fn is_by(&self, email: &str) -> bool {
        emails_match(&self.signer_email, email)
    }
}

/// Whether any signature in `signatures` was made by `email`.
#[must_use]
pub fn has_signed(signatures: &[Signature], email: &str) -> bool {
    signatures.iter().any(|signature| signature.is_by(email))
}

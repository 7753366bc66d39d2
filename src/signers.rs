//! Signer Emails
//!
//! Required signers are identified by email address. Identity is
//! case-insensitive and ignores surrounding whitespace, so `" Jane@Co.com"`
//! and `"jane@co.com"` are the same signer.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters accepted as separators in free-form signer input.
const SIGNER_SEPARATORS: [char; 3] = [',', ';', '\n'];

/// Errors raised while building a required signer list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerListError {
    /// The candidate's own email was blank.
    #[error("candidate email is required")]
    MissingCandidateEmail,

    /// An entry does not look like an email address.
    #[error("invalid signer email: {0}")]
    InvalidEmail(String),
}

/// A signer email as entered, with a case-insensitive identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerEmail(String);

impl SignerEmail {
    /// Wrap an email, trimming surrounding whitespace.
    #[must_use]
    pub fn new(email: &str) -> Self {
        Self(email.trim().to_string())
    }

    /// The email as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased identity used for comparisons.
    #[must_use]
    pub fn key(&self) -> String {
        normalize_email(&self.0)
    }

    /// Whether this email is the same signer as `other`.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        emails_match(&self.0, other)
    }

    /// Consume into the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl PartialEq for SignerEmail {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SignerEmail {}

impl Display for SignerEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for SignerEmail {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Lower-case and trim an email for identity comparisons.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Case-insensitive, whitespace-insensitive email comparison.
#[must_use]
pub fn emails_match(left: &str, right: &str) -> bool {
    normalize_email(left) == normalize_email(right)
}

/// Loose shape check: one `@` with a non-empty local part and a dotted domain.
#[must_use]
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Split free-form signer input on commas, semicolons and newlines.
///
/// Entries are trimmed and blanks dropped. Duplicates are kept; see
/// [`dedupe_signers`].
pub fn split_signer_input(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(SIGNER_SEPARATORS)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Remove case-insensitive duplicates, keeping the first occurrence and order.
#[must_use]
pub fn dedupe_signers<I, S>(signers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();

    for signer in signers {
        let signer = signer.as_ref().trim();

        if signer.is_empty() {
            continue;
        }

        let key = normalize_email(signer);

        if seen.contains(&key) {
            continue;
        }

        seen.push(key);
        result.push(signer.to_string());
    }

    result
}

/// Build the required signer list submitted when enabling signing.
///
/// The candidate's own email always comes first. Additional signers are parsed
/// from free-form input, trimmed, deduplicated and validated.
///
/// # Errors
///
/// Returns an error when the candidate email is blank or any entry is not a
/// plausible email address.
pub fn required_signer_list(
    candidate_email: &str,
    additional_input: &str,
) -> Result<Vec<String>, SignerListError> {
    let candidate_email = candidate_email.trim();

    if candidate_email.is_empty() {
        return Err(SignerListError::MissingCandidateEmail);
    }

    let signers = dedupe_signers(
        std::iter::once(candidate_email).chain(split_signer_input(additional_input)),
    );

    if let Some(invalid) = signers.iter().find(|signer| !looks_like_email(signer)) {
        return Err(SignerListError::InvalidEmail(invalid.clone()));
    }

    Ok(signers)
}

//! Signer Eligibility
//!
//! Local checks run before a signature pad is opened or a signature is sent.
//! None of them need a server round-trip.

use thiserror::Error;

use crate::{
    contracts::SigningSnapshot,
    signers::looks_like_email,
    status::{SigningStatus, is_required_signer},
};

/// Outcome of a successful eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerEligibility {
    /// The signer is on the required list.
    Required,

    /// The signer is not on the required list. Signing is allowed, but the
    /// signature does not count towards progress.
    NotRequired,
}

impl SignerEligibility {
    /// Whether a non-blocking advisory should be shown.
    #[must_use]
    pub const fn needs_advisory(self) -> bool {
        matches!(self, Self::NotRequired)
    }
}

/// Reasons a signer is blocked locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerCheckError {
    #[error("please enter your full name")]
    MissingName,

    #[error("please enter your email address")]
    MissingEmail,

    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    #[error("{0} has already signed this contract")]
    AlreadySigned(String),

    #[error("this contract is not accepting signatures ({0})")]
    SigningClosed(SigningStatus),
}

/// Check whether `name`/`email` may sign the contract described by `snapshot`.
///
/// # Errors
///
/// Returns an error when the name or email is blank or malformed, when the
/// email already has a signature, or when the contract no longer accepts
/// signatures.
pub fn check_signer(
    snapshot: &SigningSnapshot,
    name: &str,
    email: &str,
) -> Result<SignerEligibility, SignerCheckError> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        return Err(SignerCheckError::MissingName);
    }

    if email.is_empty() {
        return Err(SignerCheckError::MissingEmail);
    }

    if !looks_like_email(email) {
        return Err(SignerCheckError::InvalidEmail(email.to_string()));
    }

    if snapshot.has_signed(email) {
        return Err(SignerCheckError::AlreadySigned(email.to_string()));
    }

    let status = snapshot.derived().status;

    if !status.accepts_signatures() {
        return Err(SignerCheckError::SigningClosed(status));
    }

    if is_required_signer(&snapshot.required_signers, email) {
        Ok(SignerEligibility::Required)
    } else {
        Ok(SignerEligibility::NotRequired)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::signatures::{ResourceId, Signature};

    use super::*;

    fn snapshot(signed: &[&str]) -> SigningSnapshot {
        SigningSnapshot {
            public_signing_enabled: true,
            required_signers: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            signatures: signed
                .iter()
                .map(|email| Signature {
                    id: ResourceId::new(*email),
                    signer_name: "Signer".to_string(),
                    signer_email: (*email).to_string(),
                    signed_at: Timestamp::UNIX_EPOCH,
                })
                .collect(),
        }
    }

    #[test]
    fn required_signer_is_eligible() {
        let result = check_signer(&snapshot(&[]), "Ann", "A@X.com");

        assert_eq!(result, Ok(SignerEligibility::Required));
    }

    #[test]
    fn unknown_signer_gets_advisory_not_block() {
        let result = check_signer(&snapshot(&["a@x.com"]), "Cat", "c@x.com");

        assert_eq!(result, Ok(SignerEligibility::NotRequired));
        assert!(SignerEligibility::NotRequired.needs_advisory());
    }

    #[test]
    fn already_signed_is_blocked_case_insensitively() {
        let result = check_signer(&snapshot(&["a@x.com"]), "Ann", " A@X.COM ");

        assert_eq!(
            result,
            Err(SignerCheckError::AlreadySigned("A@X.COM".to_string()))
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert_eq!(
            check_signer(&snapshot(&[]), "  ", "a@x.com"),
            Err(SignerCheckError::MissingName)
        );
        assert_eq!(
            check_signer(&snapshot(&[]), "Ann", ""),
            Err(SignerCheckError::MissingEmail)
        );
    }

    #[test]
    fn fully_signed_contract_is_closed() {
        let result = check_signer(&snapshot(&["a@x.com", "b@x.com"]), "Cat", "c@x.com");

        assert_eq!(
            result,
            Err(SignerCheckError::SigningClosed(SigningStatus::FullySigned))
        );
    }

    #[test]
    fn disabled_contract_is_closed() {
        let mut disabled = snapshot(&[]);
        disabled.public_signing_enabled = false;

        let result = check_signer(&disabled, "Ann", "a@x.com");

        assert_eq!(
            result,
            Err(SignerCheckError::SigningClosed(
                SigningStatus::SigningDisabled
            ))
        );
    }
}

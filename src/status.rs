//! Signing Status
//!
//! The signing status of a contract is derived from three inputs: whether
//! public signing is enabled, the required signer list and the recorded
//! signatures. Every surface that displays a status goes through
//! [`derive_status`] so two views of the same snapshot never disagree.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{
    signatures::Signature,
    signers::{dedupe_signers, emails_match, normalize_email},
};

/// Upper bound of [`SigningProgress::progress`].
pub const COMPLETE: u8 = 100;

/// Signing status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningStatus {
    /// Public signing is turned off; no new signatures are accepted.
    SigningDisabled,

    /// Enabled, no required signer has signed yet.
    OpenForSigning,

    /// Enabled, some but not all required signers have signed.
    PartiallySigned,

    /// Every required signer has signed.
    FullySigned,
}

impl SigningStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SigningDisabled => "signing_disabled",
            Self::OpenForSigning => "open_for_signing",
            Self::PartiallySigned => "partially_signed",
            Self::FullySigned => "fully_signed",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "signing_disabled" | "disabled" => Some(Self::SigningDisabled),
            "open_for_signing" => Some(Self::OpenForSigning),
            "partially_signed" => Some(Self::PartiallySigned),
            "fully_signed" => Some(Self::FullySigned),
            _ => None,
        }
    }

    /// Whether new signatures are accepted in this status.
    #[must_use]
    pub const fn accepts_signatures(self) -> bool {
        matches!(self, Self::OpenForSigning | Self::PartiallySigned)
    }

    /// Statuses reachable from `self` through enable, sign and disable events.
    #[must_use]
    pub const fn successors(self) -> &'static [SigningStatus] {
        match self {
            Self::SigningDisabled => &[Self::OpenForSigning],
            Self::OpenForSigning => &[
                Self::PartiallySigned,
                Self::FullySigned,
                Self::SigningDisabled,
            ],
            Self::PartiallySigned => &[Self::FullySigned, Self::SigningDisabled],
            Self::FullySigned => &[Self::SigningDisabled],
        }
    }

    /// Whether moving from `self` to `next` follows the forward-only machine.
    ///
    /// Staying in the same status is always allowed.
    #[must_use]
    pub fn can_transition_to(self, next: SigningStatus) -> bool {
        self == next || self.successors().contains(&next)
    }
}

impl Display for SigningStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Derived signing state of a contract snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningProgress {
    /// Derived status.
    pub status: SigningStatus,

    /// Percentage of required signers who have signed, `0..=100`.
    pub progress: u8,

    /// Required signers with a matching signature, in required order.
    pub matched_signers: Vec<String>,

    /// Required signers still to sign, in required order.
    pub remaining_signers: Vec<String>,

    /// Signers who signed without being on the required list.
    pub extra_signers: Vec<String>,
}

impl SigningProgress {
    /// Whether every required signer has signed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= COMPLETE && self.status == SigningStatus::FullySigned
    }

    /// Number of distinct required signers.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.matched_signers.len() + self.remaining_signers.len()
    }
}

/// Derive the signing status of a contract.
///
/// Only signatures matching a required signer (case-insensitively) count
/// towards progress, so extra signers never push progress past 100. Required
/// signers listed twice count once.
///
/// An enabled contract with no required signers is `open_for_signing` at 0%:
/// `fully_signed` needs at least one required signer. A disabled contract is
/// `signing_disabled` while progress and signer lists still describe the
/// signing history.
#[must_use]
pub fn derive_status<S>(
    required_signers: &[S],
    signatures: &[Signature],
    public_signing_enabled: bool,
) -> SigningProgress
where
    S: AsRef<str>,
{
    let required = dedupe_signers(required_signers);

    let (matched_signers, remaining_signers): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|signer| signatures.iter().any(|signature| signature.is_by(signer)));

    let extra_signers = dedupe_signers(
        signatures
            .iter()
            .map(|signature| signature.signer_email.as_str())
            .filter(|email| !required.iter().any(|signer| emails_match(signer, email))),
    );

    let progress = percentage(matched_signers.len(), required.len());

    let status = if !public_signing_enabled {
        SigningStatus::SigningDisabled
    } else if required.is_empty() || matched_signers.is_empty() {
        SigningStatus::OpenForSigning
    } else if remaining_signers.is_empty() {
        SigningStatus::FullySigned
    } else {
        SigningStatus::PartiallySigned
    };

    SigningProgress {
        status,
        progress,
        matched_signers,
        remaining_signers,
        extra_signers,
    }
}

/// `round(100 * matched / required)`, half away from zero, clamped to 100.
///
/// Returns 0 when `required` is zero.
#[must_use]
pub fn percentage(matched: usize, required: usize) -> u8 {
    if required == 0 {
        return 0;
    }

    let matched = matched.min(required) as u128;
    let required = required as u128;

    let rounded = (200 * matched + required) / (2 * required);

    u8::try_from(rounded).map_or(COMPLETE, |value| value.min(COMPLETE))
}

/// Whether `email` is on the required signer list, ignoring case.
#[must_use]
pub fn is_required_signer<S>(required_signers: &[S], email: &str) -> bool
where
    S: AsRef<str>,
{
    let email = normalize_email(email);

    required_signers
        .iter()
        .any(|signer| normalize_email(signer.as_ref()) == email)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::signatures::ResourceId;

    use super::*;

    fn signature(email: &str) -> Signature {
        Signature {
            id: ResourceId::new(email),
            signer_name: email.to_string(),
            signer_email: email.to_string(),
            signed_at: Timestamp::UNIX_EPOCH,
        }
    }

    const REQUIRED: [&str; 2] = ["a@x.com", "b@x.com"];

    #[test]
    fn no_signatures_is_open_for_signing() {
        let derived = derive_status(&REQUIRED, &[], true);

        assert_eq!(derived.status, SigningStatus::OpenForSigning);
        assert_eq!(derived.progress, 0);
        assert_eq!(derived.remaining_signers, vec!["a@x.com", "b@x.com"]);
        assert!(derived.matched_signers.is_empty());
    }

    #[test]
    fn one_of_two_signed_is_partially_signed() {
        let derived = derive_status(&REQUIRED, &[signature("a@x.com")], true);

        assert_eq!(derived.status, SigningStatus::PartiallySigned);
        assert_eq!(derived.progress, 50);
        assert_eq!(derived.matched_signers, vec!["a@x.com"]);
        assert_eq!(derived.remaining_signers, vec!["b@x.com"]);
    }

    #[test]
    fn all_signed_in_any_order_and_case_is_fully_signed() {
        let signatures = [signature("B@X.COM"), signature("a@x.com")];
        let derived = derive_status(&REQUIRED, &signatures, true);

        assert_eq!(derived.status, SigningStatus::FullySigned);
        assert_eq!(derived.progress, 100);
        assert!(derived.remaining_signers.is_empty());
        assert!(derived.is_complete());
    }

    #[test]
    fn required_signer_matches_case_insensitively() {
        let derived = derive_status(&["Jane@Co.com"], &[signature("jane@co.com")], true);

        assert_eq!(derived.status, SigningStatus::FullySigned);
        assert_eq!(derived.matched_signers, vec!["Jane@Co.com"]);
    }

    #[test]
    fn extra_signers_do_not_count_towards_progress() {
        let derived = derive_status(
            &REQUIRED,
            &[signature("a@x.com"), signature("c@x.com"), signature("d@x.com")],
            true,
        );

        assert_eq!(derived.status, SigningStatus::PartiallySigned);
        assert_eq!(derived.progress, 50);
        assert_eq!(derived.extra_signers, vec!["c@x.com", "d@x.com"]);
    }

    #[test]
    fn more_signatures_than_required_never_exceeds_100() {
        let signatures = [
            signature("a@x.com"),
            signature("a@x.com"),
            signature("b@x.com"),
            signature("z@x.com"),
        ];

        let derived = derive_status(&REQUIRED, &signatures, true);

        assert_eq!(derived.progress, 100);
        assert_eq!(derived.status, SigningStatus::FullySigned);
    }

    #[test]
    fn empty_required_signers_is_open_at_zero() {
        let empty: [&str; 0] = [];

        let derived = derive_status(&empty, &[signature("a@x.com")], true);

        assert_eq!(derived.status, SigningStatus::OpenForSigning);
        assert_eq!(derived.progress, 0);
        assert_eq!(derived.extra_signers, vec!["a@x.com"]);
    }

    #[test]
    fn disabled_keeps_history_visible() {
        let derived = derive_status(&REQUIRED, &[signature("a@x.com")], false);

        assert_eq!(derived.status, SigningStatus::SigningDisabled);
        assert_eq!(derived.progress, 50);
        assert_eq!(derived.matched_signers, vec!["a@x.com"]);
    }

    #[test]
    fn duplicate_required_signers_count_once() {
        let derived = derive_status(&["a@x.com", "A@X.com"], &[signature("a@x.com")], true);

        assert_eq!(derived.required_count(), 1);
        assert_eq!(derived.status, SigningStatus::FullySigned);
    }

    #[test]
    fn derive_status_is_idempotent() {
        let signatures = [signature("a@x.com"), signature("c@x.com")];

        let first = derive_status(&REQUIRED, &signatures, true);
        let second = derive_status(&REQUIRED, &signatures, true);

        assert_eq!(first, second);
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 2), 100);
    }

    #[test]
    fn percentage_matches_formula_for_small_lists() {
        for required in 1..=12_usize {
            for matched in 0..=required {
                let progress = usize::from(percentage(matched, required));

                // nearest whole percentage: |100m - r*p| <= r/2
                assert!(
                    (100 * matched).abs_diff(required * progress) * 2 <= required,
                    "matched {matched} of {required} gave {progress}"
                );
            }
        }
    }

    #[test]
    fn forward_transitions_only() {
        use SigningStatus::{FullySigned, OpenForSigning, PartiallySigned, SigningDisabled};

        assert!(SigningDisabled.can_transition_to(OpenForSigning));
        assert!(OpenForSigning.can_transition_to(PartiallySigned));
        assert!(PartiallySigned.can_transition_to(FullySigned));
        assert!(FullySigned.can_transition_to(SigningDisabled));
        assert!(!PartiallySigned.can_transition_to(OpenForSigning));
        assert!(!FullySigned.can_transition_to(PartiallySigned));
        assert!(!SigningDisabled.can_transition_to(FullySigned));
    }

    #[test]
    fn status_wire_names_round_trip() {
        for status in [
            SigningStatus::SigningDisabled,
            SigningStatus::OpenForSigning,
            SigningStatus::PartiallySigned,
            SigningStatus::FullySigned,
        ] {
            assert_eq!(SigningStatus::parse(status.as_str()), Some(status));
        }

        assert_eq!(SigningStatus::parse("draft"), None);
    }
}

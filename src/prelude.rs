//! Countersign prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    contracts::{PublicContract, SigningSnapshot},
    eligibility::{SignerCheckError, SignerEligibility, check_signer},
    session::{FetchTicket, SigningSession, SnapshotOutcome, StateSource},
    signature_pad::{
        CapturedSignature, PadOptions, PadState, Point, SignaturePad, SignaturePadError,
    },
    signatures::{ResourceId, Signature},
    signers::{SignerEmail, SignerListError, emails_match, required_signer_list},
    status::{SigningProgress, SigningStatus, derive_status},
};

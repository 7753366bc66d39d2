//! Countersign
//!
//! Client-side core of a multi-party contract signing flow: the signing
//! status state machine, signer list handling, optimistic state
//! reconciliation and freehand signature capture. Everything here is pure
//! and synchronous; HTTP lives in `countersign-app`.

pub mod contracts;
pub mod eligibility;
pub mod prelude;
pub mod raster;
pub mod session;
pub mod signature_pad;
pub mod signatures;
pub mod signers;
pub mod status;

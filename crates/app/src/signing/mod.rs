//! Signing flow controllers.
//!
//! [`PublicSigningPage`] drives the unauthenticated signer flow behind a
//! signing token. [`SigningManagement`] is the company-side view that turns
//! public signing on and off. Both derive status through the same
//! [`countersign::status::derive_status`].

mod confirmation;
mod management;
mod page;

pub use confirmation::{AssumeYes, Confirmation};
pub use management::{DisableOutcome, ManagementError, SigningManagement};
pub use page::{Notice, PageError, PagePhase, PublicSigningPage, SignerForm, SubmitOutcome};

//! Public Signing Page
//!
//! Drives the unauthenticated `/contracts/{token}/sign` flow: load the
//! contract by token, collect the signer's name and email, gate the
//! signature pad, submit the signature and keep the displayed status in step
//! with the server.

use std::sync::Arc;

use countersign::{
    contracts::PublicContract,
    eligibility::{SignerCheckError, SignerEligibility, check_signer},
    session::{SigningSession, SnapshotOutcome},
    signature_pad::{PadOptions, SignaturePad, SignaturePadError},
    signatures::{ResourceId, Signature},
    status::{COMPLETE, SigningProgress, SigningStatus},
};
use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, PublicContractsApi, RetryPolicy, SignReceipt, SignRequest};

/// What the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    /// Unknown or withdrawn token. Terminal.
    NotFound,

    /// Signing form is offered.
    Open,

    /// Every required signer has signed; the form is replaced.
    Completed,

    /// Signing is not accepted, e.g. disabled by the company.
    Closed(SigningStatus),
}

/// Message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking: this email already has a signature.
    AlreadySigned(String),

    /// Non-blocking: this email is not a required signer.
    NotRequiredSigner(String),

    /// The signature was accepted.
    Signed,

    /// Submission failed; form data is kept for a retry.
    Failed(String),
}

/// Name and email typed by the signer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerForm {
    /// Full name.
    pub name: String,

    /// Email address.
    pub email: String,
}

impl SignerForm {
    /// Both fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Signing page errors.
#[derive(Debug, Error)]
pub enum PageError {
    /// The token does not resolve to a contract.
    #[error("contract not found")]
    NotFound,

    /// The signer failed local validation or may not sign.
    #[error(transparent)]
    Signer(#[from] SignerCheckError),

    #[error("open the signature pad first")]
    PadNotOpen,

    /// The pad has nothing to submit or was already confirmed.
    #[error(transparent)]
    Pad(#[from] SignaturePadError),

    /// Backend call failed; displays the message a user should see.
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

/// A signature the server accepted.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// What the backend returned.
    pub receipt: SignReceipt,

    /// Whether the signer was on the required list.
    pub eligibility: SignerEligibility,

    /// Status derived locally right after the sign request.
    pub progress: SigningProgress,
}

/// Controller for one signer's visit to a public signing link.
pub struct PublicSigningPage {
    api: Arc<dyn PublicContractsApi>,
    token: String,
    retry: RetryPolicy,
    pad_options: PadOptions,
    contract: Option<PublicContract>,
    session: Option<SigningSession>,
    form: SignerForm,
    notice: Option<Notice>,
    pad: Option<SignaturePad>,
}

impl std::fmt::Debug for PublicSigningPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicSigningPage")
            .field("phase", &self.phase())
            .field("form", &self.form)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl PublicSigningPage {
    /// Load the contract behind `token`.
    ///
    /// An unknown token yields a page in [`PagePhase::NotFound`] rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the contract cannot be fetched for any other
    /// reason after retrying.
    pub async fn load(
        api: Arc<dyn PublicContractsApi>,
        token: impl Into<String>,
        retry: RetryPolicy,
    ) -> Result<Self, PageError> {
        let token = token.into();

        let fetched = {
            let api = &api;
            let token = token.as_str();

            retry
                .run("get_contract", move || api.get_contract(token))
                .await
        };

        let mut page = Self {
            api,
            token,
            retry,
            pad_options: PadOptions::default(),
            contract: None,
            session: None,
            form: SignerForm::default(),
            notice: None,
            pad: None,
        };

        match fetched {
            Ok(contract) => {
                info!(contract = %contract.id, "loaded contract for signing");

                page.session = Some(SigningSession::new(contract.snapshot()));
                page.contract = Some(contract);
            }
            Err(ApiError::NotFound) => info!("signing token not found"),
            Err(error) => return Err(error.into()),
        }

        Ok(page)
    }

    /// Use different canvas settings for pads opened from now on.
    pub fn set_pad_options(&mut self, options: PadOptions) {
        self.pad_options = options;
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Contract as last loaded. `None` when not found.
    #[must_use]
    pub fn contract(&self) -> Option<&PublicContract> {
        self.contract.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> Option<&SigningSession> {
        self.session.as_ref()
    }

    /// Derived status of the current view.
    #[must_use]
    pub fn progress(&self) -> Option<SigningProgress> {
        self.session.as_ref().map(SigningSession::derived)
    }

    #[must_use]
    pub fn form(&self) -> &SignerForm {
        &self.form
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The open signature pad, if any.
    pub fn pad_mut(&mut self) -> Option<&mut SignaturePad> {
        self.pad.as_mut()
    }

    /// What the page should show. Completion is decided from derived
    /// progress, never from the server status string.
    #[must_use]
    pub fn phase(&self) -> PagePhase {
        let Some(session) = &self.session else {
            return PagePhase::NotFound;
        };

        let derived = session.derived();

        if derived.progress >= COMPLETE {
            PagePhase::Completed
        } else if derived.status.accepts_signatures() {
            PagePhase::Open
        } else {
            PagePhase::Closed(derived.status)
        }
    }

    /// Whether the "open signature pad" action is enabled.
    #[must_use]
    pub fn can_open_pad(&self) -> bool {
        self.phase() == PagePhase::Open && self.form.is_complete()
    }

    /// Update the signer's details. Changing them closes an open pad.
    pub fn set_signer(&mut self, name: impl Into<String>, email: impl Into<String>) {
        let form = SignerForm {
            name: name.into(),
            email: email.into(),
        };

        if form != self.form {
            self.pad = None;
            self.notice = None;
        }

        self.form = form;
    }

    /// Check the signer locally and open the signature pad.
    ///
    /// # Errors
    ///
    /// Returns an error when the page is not open for signing, a field is
    /// missing, or the email already signed.
    pub fn open_signature_pad(&mut self) -> Result<SignerEligibility, PageError> {
        let eligibility = self.check_current_signer()?;

        if eligibility.needs_advisory() {
            self.notice = Some(Notice::NotRequiredSigner(
                self.form.email.trim().to_string(),
            ));
        }

        if let Some(pad) = self.pad.as_mut() {
            pad.reset();
        } else {
            self.pad = Some(SignaturePad::new(self.pad_options)?);
        }

        Ok(eligibility)
    }

    /// Submit the drawn signature.
    ///
    /// The duplicate-signer check runs again before anything is sent. On
    /// success the signature is recorded locally so progress updates at once;
    /// call [`refresh`](Self::refresh) afterwards to reconcile with the
    /// server. On failure the form is kept and the pad re-armed.
    ///
    /// # Errors
    ///
    /// Returns an error for local validation failures, a pad that is empty
    /// or already submitted, or a failed sign request.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, PageError> {
        let eligibility = self.check_current_signer()?;

        let pad = self.pad.as_mut().ok_or(PageError::PadNotOpen)?;
        let captured = pad.confirm()?;

        pad.set_busy(true);

        let signer_name = self.form.name.trim().to_string();
        let signer_email = self.form.email.trim().to_string();

        let request = SignRequest {
            signer_name: signer_name.clone(),
            signer_email: signer_email.clone(),
            signature_data: captured.data_url(),
        };

        match self.api.sign(&self.token, request).await {
            Ok(receipt) => {
                self.pad = None;
                self.notice = Some(Notice::Signed);

                let session = self.session.as_mut().ok_or(PageError::NotFound)?;

                session.record_local_signature(Signature {
                    id: ResourceId::new(format!("local:{signer_email}")),
                    signer_name,
                    signer_email,
                    signed_at: Timestamp::now(),
                });

                let progress = session.derived();

                info!(
                    status = %progress.status,
                    progress = progress.progress,
                    fully_signed = receipt.fully_signed,
                    "signature accepted"
                );

                Ok(SubmitOutcome {
                    receipt,
                    eligibility,
                    progress,
                })
            }
            Err(ApiError::NotFound) => {
                self.mark_not_found();

                Err(PageError::NotFound)
            }
            Err(error) => {
                warn!("sign request failed: {error}");

                if let Some(pad) = self.pad.as_mut() {
                    pad.set_busy(false);
                    pad.reset();
                }

                self.notice = Some(Notice::Failed(error.user_message()));

                Err(error.into())
            }
        }
    }

    /// Refetch the contract and reconcile with server truth.
    ///
    /// # Errors
    ///
    /// Returns an error when the page is already terminal or the fetch fails
    /// after retrying. A 404 makes the page terminal.
    pub async fn refresh(&mut self) -> Result<SnapshotOutcome, PageError> {
        let ticket = self
            .session
            .as_mut()
            .ok_or(PageError::NotFound)?
            .begin_fetch();

        let fetched = {
            let api = &self.api;
            let token = self.token.as_str();

            self.retry
                .run("get_contract", move || api.get_contract(token))
                .await
        };

        let contract = match fetched {
            Ok(contract) => contract,
            Err(ApiError::NotFound) => {
                self.mark_not_found();

                return Err(PageError::NotFound);
            }
            Err(error) => return Err(error.into()),
        };

        let session = self.session.as_mut().ok_or(PageError::NotFound)?;
        let outcome = session.apply_server_snapshot(ticket, contract.snapshot());

        if outcome == SnapshotOutcome::Applied {
            self.contract = Some(contract);
        }

        Ok(outcome)
    }

    fn check_current_signer(&mut self) -> Result<SignerEligibility, PageError> {
        let session = self.session.as_ref().ok_or(PageError::NotFound)?;

        match check_signer(&session.snapshot(), &self.form.name, &self.form.email) {
            Ok(eligibility) => Ok(eligibility),
            Err(error) => {
                if let SignerCheckError::AlreadySigned(email) = &error {
                    self.notice = Some(Notice::AlreadySigned(email.clone()));
                    self.pad = None;
                }

                Err(error.into())
            }
        }
    }

    fn mark_not_found(&mut self) {
        info!("signing token no longer resolves");

        self.contract = None;
        self.session = None;
        self.pad = None;
    }
}

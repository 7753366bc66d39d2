//! Signing Management
//!
//! Company-side controller for one contract: enable public signing with a
//! list of required signers, disable it again, and refresh the signing
//! status.

use std::sync::Arc;

use countersign::{
    session::{SigningSession, SnapshotOutcome},
    signatures::ResourceId,
    signers::{SignerListError, required_signer_list},
    status::SigningProgress,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    api::{ApiError, ContractSigningApi, RetryPolicy},
    signing::Confirmation,
};

/// Signing management errors.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The signer list failed validation.
    #[error(transparent)]
    Signers(#[from] SignerListError),

    /// Backend call failed; displays the message a user should see.
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

/// Result of [`SigningManagement::disable_signing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableOutcome {
    /// The backend disabled public signing.
    Disabled,

    /// The operator declined; nothing was sent.
    Declined,
}

/// Admin view of a contract's signing state.
pub struct SigningManagement {
    api: Arc<dyn ContractSigningApi>,
    candidate: ResourceId,
    contract: ResourceId,
    retry: RetryPolicy,
    session: SigningSession,
    signing_url: Option<String>,
}

impl std::fmt::Debug for SigningManagement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningManagement")
            .field("candidate", &self.candidate)
            .field("contract", &self.contract)
            .field("session", &self.session)
            .field("signing_url", &self.signing_url)
            .finish_non_exhaustive()
    }
}

impl SigningManagement {
    /// Load the current signing status.
    ///
    /// # Errors
    ///
    /// Returns an error when the status cannot be fetched after retrying.
    pub async fn load(
        api: Arc<dyn ContractSigningApi>,
        candidate: ResourceId,
        contract: ResourceId,
        retry: RetryPolicy,
    ) -> Result<Self, ManagementError> {
        let report = {
            let api = &api;
            let (candidate, contract) = (&candidate, &contract);

            retry
                .run("signing_status", move || {
                    api.signing_status(candidate, contract)
                })
                .await?
        };

        Ok(Self {
            session: SigningSession::new(report.snapshot()),
            signing_url: report.signing_url,
            api,
            candidate,
            contract,
            retry,
        })
    }

    #[must_use]
    pub fn candidate(&self) -> &ResourceId {
        &self.candidate
    }

    #[must_use]
    pub fn contract(&self) -> &ResourceId {
        &self.contract
    }

    #[must_use]
    pub fn session(&self) -> &SigningSession {
        &self.session
    }

    /// Derived status of the current view.
    #[must_use]
    pub fn progress(&self) -> SigningProgress {
        self.session.derived()
    }

    /// Public signing URL while signing is enabled.
    #[must_use]
    pub fn signing_url(&self) -> Option<&str> {
        self.signing_url.as_deref()
    }

    /// Enable public signing.
    ///
    /// `additional_signers` is free-form input; it is split, trimmed,
    /// deduplicated and validated before anything is sent. The candidate
    /// always comes first. The local signature list starts over.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid signer list or a failed request.
    #[instrument(skip_all, fields(candidate = %self.candidate, contract = %self.contract))]
    pub async fn enable_signing(
        &mut self,
        candidate_email: &str,
        additional_signers: &str,
    ) -> Result<&str, ManagementError> {
        let required_signers = required_signer_list(candidate_email, additional_signers)?;

        let enabled = self
            .api
            .enable_signing(&self.candidate, &self.contract, &required_signers)
            .await
            .inspect_err(|error| warn!("enable signing failed: {error}"))?;

        let stored_signers = if enabled.required_signers.is_empty() {
            required_signers
        } else {
            enabled.required_signers
        };

        info!(
            required = stored_signers.len(),
            "public signing enabled"
        );

        self.session.record_enabled(stored_signers);

        Ok(self.signing_url.insert(enabled.signing_url).as_str())
    }

    /// Disable public signing after `confirmation` agrees.
    ///
    /// Signatures already collected stay visible.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip_all, fields(candidate = %self.candidate, contract = %self.contract))]
    pub async fn disable_signing(
        &mut self,
        confirmation: &dyn Confirmation,
    ) -> Result<DisableOutcome, ManagementError> {
        let prompt = format!(
            "Disable public signing for contract {}? Signers will no longer be able to sign.",
            self.contract
        );

        if !confirmation.confirm(&prompt) {
            info!("disable signing declined");

            return Ok(DisableOutcome::Declined);
        }

        self.api
            .disable_signing(&self.candidate, &self.contract)
            .await
            .inspect_err(|error| warn!("disable signing failed: {error}"))?;

        info!("public signing disabled");

        self.session.record_disabled();
        self.signing_url = None;

        Ok(DisableOutcome::Disabled)
    }

    /// Refetch the signing status ("Refresh Status").
    ///
    /// # Errors
    ///
    /// Returns an error when the status cannot be fetched after retrying.
    pub async fn refresh(&mut self) -> Result<SnapshotOutcome, ManagementError> {
        let ticket = self.session.begin_fetch();

        let report = {
            let api = &self.api;
            let (candidate, contract) = (&self.candidate, &self.contract);

            self.retry
                .run("signing_status", move || {
                    api.signing_status(candidate, contract)
                })
                .await?
        };

        let outcome = self
            .session
            .apply_server_snapshot(ticket, report.snapshot());

        if outcome == SnapshotOutcome::Applied {
            self.signing_url = report.signing_url;
        }

        Ok(outcome)
    }
}

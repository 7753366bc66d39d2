//! Show Contract Handler

use countersign::{signatures::Signature, status::SigningProgress};
use countersign_app::signing::{PagePhase, PublicSigningPage};
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{contracts::errors::into_status_error, extensions::*};

/// A recorded signature.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignatureResponse {
    pub signer_name: String,
    pub signer_email: String,

    /// RFC 3339 timestamp
    pub signed_at: String,
}

impl From<&Signature> for SignatureResponse {
    fn from(signature: &Signature) -> Self {
        Self {
            signer_name: signature.signer_name.clone(),
            signer_email: signature.signer_email.clone(),
            signed_at: signature.signed_at.to_string(),
        }
    }
}

/// Signing status derived from the contract's signatures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProgressResponse {
    /// `signing_disabled`, `open_for_signing`, `partially_signed` or `fully_signed`
    pub status: String,

    /// Percentage of required signers who have signed
    pub progress: u8,

    pub matched_signers: Vec<String>,
    pub remaining_signers: Vec<String>,

    /// Signers who are not on the required list
    pub extra_signers: Vec<String>,
}

impl From<SigningProgress> for ProgressResponse {
    fn from(progress: SigningProgress) -> Self {
        Self {
            status: progress.status.to_string(),
            progress: progress.progress,
            matched_signers: progress.matched_signers,
            remaining_signers: progress.remaining_signers,
            extra_signers: progress.extra_signers,
        }
    }
}

/// Contract Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContractResponse {
    pub id: String,
    pub name: String,
    pub candidate: Option<String>,
    pub company: Option<String>,

    /// Contract body as HTML
    pub rendered_html: String,

    pub required_signers: Vec<String>,
    pub signatures: Vec<SignatureResponse>,
    pub signing: ProgressResponse,

    /// Whether the signing form is offered
    pub accepting_signatures: bool,
}

/// Show Contract Handler
///
/// Returns the contract behind a signing token with its derived status.
#[endpoint(
    tags("contracts"),
    summary = "Show Contract",
    responses(
        (status_code = StatusCode::OK, description = "Contract found"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown or withdrawn token"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Backend unavailable"),
    ),
)]
pub(crate) async fn handler(
    token: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ContractResponse>, StatusError> {
    let state = depot.portal_state()?;

    let page = PublicSigningPage::load(
        state.app.contracts.clone(),
        token.into_inner(),
        state.app.retry,
    )
    .await
    .map_err(into_status_error)?;

    let (Some(contract), Some(session)) = (page.contract(), page.session()) else {
        return Err(StatusError::not_found().brief("Contract not found"));
    };

    let snapshot = session.snapshot();

    Ok(Json(ContractResponse {
        id: contract.id.to_string(),
        name: contract.name.clone(),
        candidate: contract.candidate.clone(),
        company: contract.company.clone(),
        rendered_html: contract.rendered_html.clone(),
        required_signers: snapshot.required_signers.clone(),
        signatures: snapshot.signatures.iter().map(Into::into).collect(),
        signing: session.derived().into(),
        accepting_signatures: page.phase() == PagePhase::Open,
    }))
}

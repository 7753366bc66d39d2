//! Sign Contract Handler

use countersign::{eligibility::SignerEligibility, signature_pad::Point};
use countersign_app::signing::{PagePhase, PublicSigningPage};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    contracts::{errors::into_status_error, handlers::show::ProgressResponse},
    extensions::*,
};

/// A point on the signature canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub(crate) struct PointInput {
    pub x: f32,
    pub y: f32,
}

impl From<PointInput> for Point {
    fn from(point: PointInput) -> Self {
        Point {
            x: point.x,
            y: point.y,
        }
    }
}

/// Sign Contract Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignContractRequest {
    pub signer_name: String,
    pub signer_email: String,

    /// Pen strokes as drawn; each stroke is a list of points.
    pub strokes: Vec<Vec<PointInput>>,
}

/// Sign Contract Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignContractResponse {
    /// Status derived right after the signature was accepted
    pub signing: ProgressResponse,

    /// Backend's view of completion
    pub fully_signed: bool,

    /// The signer is not on the required list; the signature was still recorded
    pub not_required_signer: bool,
}

/// Sign Contract Handler
#[endpoint(
    tags("contracts"),
    summary = "Sign Contract",
    responses(
        (status_code = StatusCode::CREATED, description = "Signature recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing name, email or signature"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown or withdrawn token"),
        (status_code = StatusCode::CONFLICT, description = "Already signed or signing closed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Rejected by the backend"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Backend unavailable"),
    ),
)]
pub(crate) async fn handler(
    token: PathParam<String>,
    json: JsonBody<SignContractRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SignContractResponse>, StatusError> {
    let state = depot.portal_state()?;
    let request = json.into_inner();

    let mut page = PublicSigningPage::load(
        state.app.contracts.clone(),
        token.into_inner(),
        state.app.retry,
    )
    .await
    .map_err(into_status_error)?;

    match page.phase() {
        PagePhase::Open => {}
        PagePhase::NotFound => return Err(StatusError::not_found().brief("Contract not found")),
        PagePhase::Completed => {
            return Err(StatusError::conflict().brief("This contract is already fully signed"));
        }
        PagePhase::Closed(_) => {
            return Err(StatusError::conflict().brief("This contract is not accepting signatures"));
        }
    }

    page.set_signer(request.signer_name, request.signer_email);
    page.open_signature_pad().map_err(into_status_error)?;

    if let Some(pad) = page.pad_mut() {
        for stroke in request.strokes {
            let mut points = stroke.into_iter().map(Point::from);

            let Some(first) = points.next() else {
                continue;
            };

            pad.pointer_down(first);

            for point in points {
                pad.pointer_move(point);
            }

            pad.pointer_up();
        }
    }

    let outcome = page.submit().await.map_err(into_status_error)?;

    info!(
        status = %outcome.progress.status,
        progress = outcome.progress.progress,
        "contract signed through portal"
    );

    res.status_code(StatusCode::CREATED);

    Ok(Json(SignContractResponse {
        fully_signed: outcome.receipt.fully_signed,
        not_required_signer: outcome.eligibility == SignerEligibility::NotRequired,
        signing: outcome.progress.into(),
    }))
}

#[cfg(test)]
mod tests {
    use countersign_app::api::{ApiError, MockPublicContractsApi, SignReceipt};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{contract_service, make_contract};

    use super::*;

    fn make_service(api: MockPublicContractsApi) -> Service {
        contract_service(api, Router::with_path("contracts/{token}/sign").post(handler))
    }

    fn body(email: &str) -> serde_json::Value {
        json!({
            "signer_name": "Ann Example",
            "signer_email": email,
            "strokes": [[{ "x": 10.0, "y": 10.0 }, { "x": 80.0, "y": 40.0 }]],
        })
    }

    #[tokio::test]
    async fn test_sign_records_signature() -> TestResult {
        let contract = make_contract(&[], Some("open_for_signing"))?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign()
            .once()
            .withf(|token, request| {
                token == "tok-1"
                    && request.signer_email == "a@x.com"
                    && request.signature_data.starts_with("data:image/png;base64,")
            })
            .return_once(|_, _| {
                Ok(SignReceipt {
                    fully_signed: false,
                    remaining_signers: vec!["b@x.com".to_string()],
                })
            });

        let mut res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&body("a@x.com"))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let response: SignContractResponse = res.take_json().await?;

        assert_eq!(response.signing.status, "partially_signed");
        assert_eq!(response.signing.progress, 50);
        assert!(!response.not_required_signer);

        Ok(())
    }

    #[tokio::test]
    async fn test_already_signed_returns_409_without_calling_sign() -> TestResult {
        let contract = make_contract(&["a@x.com"], Some("partially_signed"))?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&body("A@X.COM"))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_name_returns_400_without_calling_sign() -> TestResult {
        let contract = make_contract(&[], None)?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&json!({
                "signer_name": " ",
                "signer_email": "a@x.com",
                "strokes": [[{ "x": 1.0, "y": 1.0 }]],
            }))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_signature_returns_400() -> TestResult {
        let contract = make_contract(&[], None)?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&json!({
                "signer_name": "Ann",
                "signer_email": "a@x.com",
                "strokes": [],
            }))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unlisted_signer_is_flagged() -> TestResult {
        let contract = make_contract(&[], None)?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign()
            .once()
            .return_once(|_, _| Ok(SignReceipt::default()));

        let mut res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&body("c@x.com"))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let response: SignContractResponse = res.take_json().await?;

        assert!(response.not_required_signer);
        assert_eq!(response.signing.progress, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token_returns_404() -> TestResult {
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(|_| Err(ApiError::NotFound));
        api.expect_sign().never();

        let res = TestClient::post("http://example.com/contracts/gone/sign")
            .json(&body("a@x.com"))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_backend_failure_on_sign_returns_502() -> TestResult {
        let contract = make_contract(&[], None)?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign()
            .once()
            .return_once(|_, _| Err(ApiError::Timeout));

        let res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&body("a@x.com"))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_contract_returns_409() -> TestResult {
        let contract = make_contract(&[], Some("signing_disabled"))?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let res = TestClient::post("http://example.com/contracts/tok-1/sign")
            .json(&body("a@x.com"))
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}

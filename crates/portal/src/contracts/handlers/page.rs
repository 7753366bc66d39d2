//! Signing Page Handler

use countersign::signature_pad::PadOptions;
use countersign_app::signing::{PageError, PagePhase, PublicSigningPage};
use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::error;

use crate::{contracts::views, extensions::*};

/// Signing Page Handler
///
/// Renders the public signing page. Unknown tokens get a dead-end page.
#[endpoint(
    tags("contracts"),
    summary = "Signing Page",
    responses(
        (status_code = StatusCode::OK, description = "Signing page"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown or withdrawn token"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Backend unavailable"),
    ),
)]
pub(crate) async fn handler(
    token: PathParam<String>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.portal_state()?;

    let page = PublicSigningPage::load(
        state.app.contracts.clone(),
        token.into_inner(),
        state.app.retry,
    )
    .await;

    match page {
        Ok(page) if page.phase() == PagePhase::NotFound => {
            res.status_code(StatusCode::NOT_FOUND);
            res.render(Text::Html(views::not_found_page()));
        }
        Ok(page) => res.render(Text::Html(views::signing_page(&page, PadOptions::default()))),
        Err(PageError::Api(error)) => {
            error!("failed to load contract for signing page: {error}");

            res.status_code(StatusCode::BAD_GATEWAY);
            res.render(Text::Html(views::unavailable_page(&error.user_message())));
        }
        Err(error) => {
            error!("failed to load contract for signing page: {error}");

            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Text::Html(views::unavailable_page(&error.to_string())));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use countersign_app::api::{ApiError, MockPublicContractsApi};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        contracts::views::tests::opening_tag,
        test_helpers::{contract_service, make_contract},
    };

    use super::*;

    fn make_service(api: MockPublicContractsApi) -> Service {
        contract_service(api, Router::with_path("contracts/{token}/sign").get(handler))
    }

    #[tokio::test]
    async fn test_open_contract_renders_form() -> TestResult {
        let contract = make_contract(&[], Some("open_for_signing"))?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let mut res = TestClient::get("http://example.com/contracts/tok-1/sign")
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let html = res.take_string().await?;

        assert!(html.contains("<p>Terms &amp; conditions</p>"));
        assert!(html.contains("id=\"signing-form\""));
        assert!(html.contains("data-status=\"open_for_signing\""));

        Ok(())
    }

    #[tokio::test]
    async fn test_signature_pad_starts_locked() -> TestResult {
        let contract = make_contract(&[], None)?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let mut res = TestClient::get("http://example.com/contracts/tok-1/sign")
            .send(&make_service(api))
            .await;

        let html = res.take_string().await?;

        let opener = opening_tag(&html, "open-signature-pad").ok_or("missing pad opener")?;
        let panel = opening_tag(&html, "signature-panel").ok_or("missing pad panel")?;

        assert!(opener.contains("disabled"), "opener should start disabled: {opener}");
        assert!(panel.contains("hidden"), "pad should start hidden: {panel}");

        Ok(())
    }

    #[tokio::test]
    async fn test_form_carries_signer_lists_for_advisory() -> TestResult {
        let mut contract = make_contract(&["a@x.com"], None)?;

        contract.required_signers = vec!["A@X.com".to_string(), "b@x.com".to_string()];

        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let mut res = TestClient::get("http://example.com/contracts/tok-1/sign")
            .send(&make_service(api))
            .await;

        let html = res.take_string().await?;

        let form = opening_tag(&html, "signing-form").ok_or("missing form")?;
        let advisory = opening_tag(&html, "signer-advisory").ok_or("missing advisory")?;

        assert!(form.contains(r#"data-required-signers="a@x.com b@x.com""#), "{form}");
        assert!(form.contains(r#"data-signed-signers="a@x.com""#), "{form}");
        assert!(advisory.contains("hidden"), "advisory starts hidden: {advisory}");
        assert!(html.contains("not on the list of required signers"));

        Ok(())
    }

    #[tokio::test]
    async fn test_fully_signed_contract_hides_form_despite_stale_status() -> TestResult {
        let contract = make_contract(&["a@x.com", "b@x.com"], Some("partially_signed"))?;
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let mut res = TestClient::get("http://example.com/contracts/tok-1/sign")
            .send(&make_service(api))
            .await;

        let html = res.take_string().await?;

        assert!(!html.contains("id=\"signing-form\""));
        assert!(html.contains("data-status=\"fully_signed\""));
        assert!(html.contains("All required signers have signed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_signer_names_are_escaped() -> TestResult {
        let mut contract = make_contract(&["a@x.com"], None)?;

        if let Some(signature) = contract.signatures.first_mut() {
            signature.signer_name = "<script>alert(1)</script>".to_string();
        }

        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(move |_| Ok(contract));
        api.expect_sign().never();

        let mut res = TestClient::get("http://example.com/contracts/tok-1/sign")
            .send(&make_service(api))
            .await;

        let html = res.take_string().await?;

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token_renders_not_found() -> TestResult {
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(|_| Err(ApiError::NotFound));
        api.expect_sign().never();

        let mut res = TestClient::get("http://example.com/contracts/nope/sign")
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert!(res.take_string().await?.contains("Contract not found"));

        Ok(())
    }

    #[tokio::test]
    async fn test_backend_failure_renders_unavailable() -> TestResult {
        let mut api = MockPublicContractsApi::new();

        api.expect_get_contract()
            .once()
            .return_once(|_| Err(ApiError::Timeout));
        api.expect_sign().never();

        let res = TestClient::get("http://example.com/contracts/tok-1/sign")
            .send(&make_service(api))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }
}

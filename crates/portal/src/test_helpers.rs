//! Test helpers.

use std::{sync::Arc, time::Duration};

use countersign::contracts::PublicContract;
use countersign_app::{
    api::{MockContractSigningApi, MockPublicContractsApi, RetryPolicy},
    context::AppContext,
};
use salvo::{affix_state::inject, prelude::*};
use serde_json::json;

use crate::state::State;

fn strict_signing_mock() -> MockContractSigningApi {
    let mut signing = MockContractSigningApi::new();

    signing.expect_enable_signing().never();
    signing.expect_disable_signing().never();
    signing.expect_signing_status().never();

    signing
}

pub(crate) fn state_with_contracts(contracts: MockPublicContractsApi) -> Arc<State> {
    State::shared(
        AppContext {
            contracts: Arc::new(contracts),
            signing: Arc::new(strict_signing_mock()),
            retry: RetryPolicy::none(),
        },
        Duration::from_secs(1),
    )
}

pub(crate) fn contract_service(contracts: MockPublicContractsApi, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_contracts(contracts)))
            .push(route),
    )
}

/// Contract requiring `a@x.com` and `b@x.com`, signed by `signed`.
pub(crate) fn make_contract(
    signed: &[&str],
    server_status: Option<&str>,
) -> Result<PublicContract, serde_json::Error> {
    let signatures: Vec<_> = signed
        .iter()
        .enumerate()
        .map(|(index, email)| {
            json!({
                "id": index + 1,
                "signer_name": "Signer",
                "signer_email": email,
                "signed_at": "2026-03-01T10:00:00Z",
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": 9,
        "name": "Employment Agreement",
        "candidate": "Casey Candidate",
        "company": "Acme Ltd",
        "signing_status": server_status,
        "required_signers": ["a@x.com", "b@x.com"],
        "rendered_html": "<p>Terms &amp; conditions</p>",
        "signatures": signatures,
    }))
}

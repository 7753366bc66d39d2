//! HTTP client for the onboarding backend's contract signing endpoints.

use async_trait::async_trait;
use countersign::{contracts::PublicContract, signatures::ResourceId};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    api::{
        ApiError, ContractSigningApi, PublicContractsApi, SignReceipt, SignRequest,
        SigningEnabled, SigningStatusReport,
        records::{EnableSigningRequest, Envelope, ErrorBody, PublicContractData},
    },
    config::{ApiConfig, BearerToken},
};

/// JSON REST client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    bearer_token: Option<BearerToken>,
    http: Client,
}

impl ApiClient {
    /// Create a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot carry a path or the HTTP
    /// client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: config.base_url,
            bearer_token: config.bearer_token,
            http,
        })
    }

    /// Build an endpoint URL, percent-encoding each segment.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn contract_endpoint(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
        action: &str,
    ) -> Result<Url, ApiError> {
        self.endpoint(&[
            "candidates",
            candidate.as_str(),
            "contracts",
            contract.as_str(),
            action,
        ])
    }

    fn authenticated(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer_token.as_ref().ok_or(ApiError::Unauthorized)?;

        Ok(request.bearer_auth(token.expose()))
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        debug!(status = status.as_u16(), "backend returned an error status");

        match status {
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(ApiError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            _ => {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(ErrorBody::into_message);

                Err(ApiError::Server { status, message })
            }
        }
    }

    async fn data<T>(request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = Self::send(request)
            .await?
            .json()
            .await
            .map_err(ApiError::Decode)?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl PublicContractsApi for ApiClient {
    #[instrument(skip_all)]
    async fn get_contract(&self, token: &str) -> Result<PublicContract, ApiError> {
        let url = self.endpoint(&["public", "contracts", token])?;

        let data: PublicContractData = Self::data(self.http.get(url)).await?;

        Ok(data.contract)
    }

    #[instrument(skip_all)]
    async fn sign(&self, token: &str, request: SignRequest) -> Result<SignReceipt, ApiError> {
        let url = self.endpoint(&["public", "contracts", token, "sign"])?;

        Self::data(self.http.post(url).json(&request)).await
    }
}

#[async_trait]
impl ContractSigningApi for ApiClient {
    #[instrument(skip_all, fields(%candidate, %contract))]
    async fn enable_signing(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
        required_signers: &[String],
    ) -> Result<SigningEnabled, ApiError> {
        let url = self.contract_endpoint(candidate, contract, "enable_signing")?;

        let request = self
            .authenticated(self.http.post(url))?
            .json(&EnableSigningRequest { required_signers });

        Self::data(request).await
    }

    #[instrument(skip_all, fields(%candidate, %contract))]
    async fn disable_signing(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
    ) -> Result<(), ApiError> {
        let url = self.contract_endpoint(candidate, contract, "disable_signing")?;

        Self::send(self.authenticated(self.http.post(url))?).await?;

        Ok(())
    }

    #[instrument(skip_all, fields(%candidate, %contract))]
    async fn signing_status(
        &self,
        candidate: &ResourceId,
        contract: &ResourceId,
    ) -> Result<SigningStatusReport, ApiError> {
        let url = self.contract_endpoint(candidate, contract, "signing_status")?;

        Self::data(self.authenticated(self.http.get(url))?).await
    }
}

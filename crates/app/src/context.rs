//! App Context

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiError, ContractSigningApi, PublicContractsApi, RetryPolicy},
    config::ApiConfig,
};

/// Context construction errors.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The HTTP client could not be built.
    #[error("failed to build backend client")]
    Client(#[source] ApiError),
}

/// Services shared by the CLI and the portal.
#[derive(Clone)]
pub struct AppContext {
    /// Token-authenticated public contract endpoints.
    pub contracts: Arc<dyn PublicContractsApi>,

    /// Authenticated signing management endpoints.
    pub signing: Arc<dyn ContractSigningApi>,

    /// Retry policy for idempotent reads.
    pub retry: RetryPolicy,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from backend API settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_api_config(config: ApiConfig) -> Result<Self, AppInitError> {
        let retry = config.retry;
        let client = Arc::new(ApiClient::new(config).map_err(AppInitError::Client)?);

        Ok(Self {
            contracts: client.clone(),
            signing: client,
            retry,
        })
    }
}

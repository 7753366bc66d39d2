//! Backend API configuration.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use clap::Args;
use reqwest::Url;
use zeroize::Zeroizing;

use crate::api::RetryPolicy;

/// Bearer token for the authenticated company endpoints.
///
/// Wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(Zeroizing::new(token))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Settings for [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL, e.g. `"https://api.example.com/api/v1"`.
    pub base_url: Url,

    /// Token for authenticated endpoints. Public endpoints never send it.
    pub bearer_token: Option<BearerToken>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Retry policy for idempotent reads.
    pub retry: RetryPolicy,
}

/// Backend API settings from CLI arguments or the environment.
#[derive(Debug, Args)]
pub struct ApiArgs {
    /// Backend API base URL
    #[arg(long, env = "COUNTERSIGN_API_URL")]
    pub api_url: Url,

    /// Bearer token for company endpoints
    #[arg(long, env = "COUNTERSIGN_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "COUNTERSIGN_API_TIMEOUT_SECONDS", default_value_t = 15_u64)]
    pub api_timeout_seconds: u64,

    /// Attempts for idempotent reads (status refresh, contract reload)
    #[arg(long, env = "COUNTERSIGN_API_READ_ATTEMPTS", default_value_t = 3_u32)]
    pub api_read_attempts: u32,

    /// Base delay between read attempts in milliseconds; doubles per attempt
    #[arg(long, env = "COUNTERSIGN_API_RETRY_DELAY_MS", default_value_t = 200_u64)]
    pub api_retry_delay_ms: u64,
}

impl From<ApiArgs> for ApiConfig {
    fn from(args: ApiArgs) -> Self {
        Self {
            base_url: args.api_url,
            bearer_token: args
                .api_token
                .filter(|token| !token.trim().is_empty())
                .map(BearerToken::new),
            timeout: Duration::from_secs(args.api_timeout_seconds),
            retry: RetryPolicy::new(
                args.api_read_attempts,
                Duration::from_millis(args.api_retry_delay_ms),
            ),
        }
    }
}

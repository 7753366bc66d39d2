//! API client errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the server gave no usable error message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Backend API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown or withdrawn token, or unknown contract.
    #[error("contract not found")]
    NotFound,

    /// Missing, invalid or insufficient bearer token.
    #[error("not authorized")]
    Unauthorized,

    /// Non-2xx response. `message` is the server's own message when it sent one.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        /// HTTP status.
        status: StatusCode,

        /// Server-provided message.
        message: Option<String>,
    },

    /// No response within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("network error")]
    Transport(#[source] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("unexpected response body")]
    Decode(#[source] reqwest::Error),

    /// Configured base URL cannot be joined with endpoint paths.
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),

    /// HTTP client construction failed.
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Whether repeating the same idempotent request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Server { status, .. } => status.is_server_error(),
            Self::NotFound
            | Self::Unauthorized
            | Self::Decode(_)
            | Self::InvalidBaseUrl(_)
            | Self::Client(_) => false,
        }
    }

    /// Text to show a user: the server's message verbatim when available,
    /// otherwise a generic failure message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::NotFound => "Contract not found.".to_string(),
            Self::Unauthorized => "You are not allowed to do that.".to_string(),
            Self::Timeout => "The request timed out. Please try again.".to_string(),
            Self::Server { message: None, .. }
            | Self::Transport(_)
            | Self::Decode(_)
            | Self::InvalidBaseUrl(_)
            | Self::Client(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error)
        } else {
            Self::Transport(error)
        }
    }
}

//! API-specific error types
//!
//! Classifies remote failures so callers can tell a bad token from a flaky
//! network.

use reqwest::StatusCode;
use thiserror::Error;
use toggldeck_domain::DeckError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401, 403: the token is wrong or revoked
    Authentication,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx, unparseable bodies
    Client,
    /// Connection failures and timeouts
    Network,
}

/// Failure of a Toggl API call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Category of this error.
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) | Self::NotFound(_) => ApiErrorCategory::Client,
            Self::Network(_) => ApiErrorCategory::Network,
        }
    }

    /// Whether a later poll may succeed without user action.
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    pub(crate) fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Auth(message)
        } else if status == StatusCode::NOT_FOUND {
            Self::NotFound(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(message)
        } else if status.is_server_error() {
            Self::Server(message)
        } else if status.is_client_error() {
            Self::Client(message)
        } else {
            Self::Network(message)
        }
    }
}

impl From<ApiError> for DeckError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Auth(_) => Self::Auth(message),
            ApiError::RateLimit(_) => Self::RateLimit(message),
            ApiError::Server(_) => Self::Remote(message),
            ApiError::Client(_) => Self::InvalidInput(message),
            ApiError::NotFound(_) => Self::NotFound(message),
            ApiError::Network(_) => Self::Network(message),
        }
    }
}

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::Network(message) => Self::Network(message),
            DeckError::Auth(message) => Self::Auth(message),
            DeckError::RateLimit(message) => Self::RateLimit(message),
            DeckError::NotFound(message) => Self::NotFound(message),
            DeckError::InvalidInput(message) | DeckError::Config(message) => Self::Client(message),
            DeckError::Remote(message)
            | DeckError::Protocol(message)
            | DeckError::Internal(message) => Self::Server(message),
        }
    }
}

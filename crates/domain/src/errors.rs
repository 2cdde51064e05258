//! Error types used throughout the application

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local (non-HTTP) error type for the dashboard client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PmDashError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for local operations
pub type Result<T> = std::result::Result<T, PmDashError>;

/// Status, URL and body of a non-success HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpFailure {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl HttpFailure {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self { status, url: url.into(), body: body.into() }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{} returned status {}", self.url, self.status)
        } else {
            write!(f, "{} returned status {}: {}", self.url, self.status, self.body)
        }
    }
}

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 on a regular call, or a rejected refresh
    Authentication,
    /// 4xx other than 401
    Validation,
    /// 5xx
    Server,
    /// Transport-level failures
    Network,
    /// Unexpected response bodies and local failures
    Local,
}

/// Errors surfaced by remote API operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authorization failed: {0}")]
    AuthExpired(HttpFailure),

    #[error("Token refresh rejected: {0}")]
    RefreshRejected(String),

    #[error("Request rejected: {0}")]
    Validation(HttpFailure),

    #[error("Server error: {0}")]
    Server(HttpFailure),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Local(#[from] PmDashError),
}

impl ApiError {
    /// Classify a non-success status into the matching error kind.
    ///
    /// 401 becomes [`ApiError::AuthExpired`], other 4xx
    /// [`ApiError::Validation`] and 5xx [`ApiError::Server`]. Any other
    /// status (an unfollowed redirect, 304, ...) is an unexpected response
    /// and becomes [`ApiError::Decode`].
    pub fn from_status(failure: HttpFailure) -> Self {
        match failure.status {
            401 => Self::AuthExpired(failure),
            400..=499 => Self::Validation(failure),
            500..=599 => Self::Server(failure),
            _ => Self::Decode(failure.to_string()),
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::AuthExpired(_) | Self::RefreshRejected(_) => ApiErrorCategory::Authentication,
            Self::Validation(_) => ApiErrorCategory::Validation,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Decode(_) | Self::Local(_) => ApiErrorCategory::Local,
        }
    }

    /// HTTP status of the failed response, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthExpired(failure) | Self::Validation(failure) | Self::Server(failure) => {
                Some(failure.status)
            }
            _ => None,
        }
    }

    /// Whether this is an authorization failure (HTTP 401)
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }
}

//! Error types shared by the session and weather controllers.
//!
//! Every variant maps onto one of three failure classes the UI cares about:
//! the request never completed (transport), the server refused the operation
//! (rejected), or the server answered with something we can't use
//! (malformed / empty). Controllers convert these into explanation strings at
//! their boundary; nothing here reaches the renderer as a fault.

use thiserror::Error;

/// Broad failure class of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Rejected,
    Malformed,
}

/// Errors raised while talking to the weather/auth backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout | ApiError::InvalidBaseUrl(_) => {
                FailureKind::Transport
            }
            ApiError::Status { .. } | ApiError::Unauthorized => FailureKind::Rejected,
            ApiError::InvalidResponse(_) | ApiError::EmptyResponse => FailureKind::Malformed,
        }
    }

    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Unable to connect. Check your internet connection.",
            ApiError::Timeout => "The request timed out. Please try again.",
            ApiError::Status { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            ApiError::Status { .. } => "The request was rejected by the server.",
            ApiError::Unauthorized => "Your session is no longer valid. Please log in again.",
            ApiError::InvalidResponse(_) => "Received an unexpected response. Please try again.",
            ApiError::EmptyResponse => "Nothing to display.",
            ApiError::InvalidBaseUrl(_) => "The server address is misconfigured. Check settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_api_error(self) -> ApiError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_api_error(self) -> ApiError {
        if self.is_timeout() {
            ApiError::Timeout
        } else if self.is_decode() {
            ApiError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            ApiError::Status {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            ApiError::Network(self)
        }
    }
}

//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an `ApiResponse` error body
    #[error("API error ({status}): {error}")]
    Api { status: u16, error: AppError },

    /// Error status without a decodable error body
    #[error("Unexpected response ({status}): {body}")]
    InvalidResponse { status: u16, body: String },

    /// Rejected locally, no request was sent
    #[error("You cannot delete your own account")]
    SelfDelete,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Error code carried by a server error
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { error, .. } => Some(error.code),
            ClientError::SelfDelete => Some(ErrorCode::CannotDeleteSelf),
            _ => None,
        }
    }

    /// HTTP status of a server error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::InvalidResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

//! Client error types

use diglib_core::ValidationError;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by [`crate::RemoteClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid book: {0}")]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// HTTP status code, if the server answered with an error status
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

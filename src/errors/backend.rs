//! Backend collaborator error types

use thiserror::Error;

/// Errors reported by a [`crate::backend::Backend`]
#[derive(Error, Debug)]
pub enum BackendError {
    /// Request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body was not the expected JSON document
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Requested resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Base URL or endpoint could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Whether the server rejected the request, as opposed to it never arriving
    pub fn is_rejection(&self) -> bool {
        matches!(self, BackendError::Status { .. } | BackendError::NotFound(_))
    }
}

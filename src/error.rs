//! Error types for the MockupSign SDK.
//!
//! Every fallible SDK operation returns [`MockupError`]. Durable store
//! failures are the exception: the signature cache logs them and falls back
//! to memory-only mode instead of surfacing them.

use thiserror::Error;

/// Result type for MockupSign operations.
pub type Result<T> = std::result::Result<T, MockupError>;

/// Errors that can occur when using the MockupSign SDK.
#[derive(Error, Debug)]
pub enum MockupError {
    /// Client options or a mockup request failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A URL looked absolute where a relative path was required.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL signer rejected the request or answered with a malformed body.
    #[error("Signing error: {message}")]
    Signing {
        /// Human-readable error message.
        message: String,
        /// HTTP status code returned by the signer, when one was received.
        status: Option<u16>,
        /// Raw response body, when one could be read.
        body: Option<String>,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The design payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything the transport produced that fits no other category.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl MockupError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        MockupError::Validation(message.into())
    }

    /// Returns true if retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            MockupError::Http(_) => true,
            MockupError::Signing {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error was raised before any I/O took place.
    pub fn is_validation(&self) -> bool {
        matches!(self, MockupError::Validation(_))
    }

    /// Returns the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MockupError::Signing { status, .. } => *status,
            MockupError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

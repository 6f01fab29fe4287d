//! Provider adapter error types.

use thiserror::Error;
use uni_engine::AdapterError;

/// Errors that can occur when talking to a provider API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The provider has no record with the requested id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The adapter has no endpoint for this object type.
    #[error("{provider} has no {object_type} endpoint")]
    UnsupportedObject {
        provider: String,
        object_type: String,
    },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl From<ProviderError> for AdapterError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Http(e) => Self::Transport(e.to_string()),
            ProviderError::Api { status, message } => Self::Api { status, message },
            ProviderError::NotFound(what) => Self::NotFound(what),
            ProviderError::Parse(message) => Self::Parse(message),
            e @ ProviderError::UnsupportedObject { .. } => Self::Unsupported(e.to_string()),
            ProviderError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
        }
    }
}

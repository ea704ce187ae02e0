//! Provider error type

use std::time::Duration;
use thiserror::Error;

/// Errors raised by a provider for a single call
///
/// The orchestrator catches every one of these and moves on to the next
/// provider; none of them reach an end user.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider is not configured (e.g. missing API key)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status not covered by a more specific variant
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response was well-formed but carried nothing usable
    #[error("Empty response")]
    EmptyResponse,

    /// The attempt did not finish within its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    /// Whether the remote side rejected the call for quota reasons
    pub fn is_quota(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::Http { status: 429, .. }
        )
    }
}

/// Result type for provider calls
pub type Result<T> = std::result::Result<T, ProviderError>;

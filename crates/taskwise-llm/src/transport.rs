//! Shared HTTP plumbing for the remote backends

use crate::error::{ProviderError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default timeout for a single HTTP request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest error body kept in an error message
const MAX_ERROR_BODY: usize = 500;

/// Build an HTTP client with a request timeout
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Send a request once and decode a JSON success body
///
/// Non-success statuses are mapped by [`status_error`]. There is no retry:
/// a failed attempt is a failed call.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    model: &str,
) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Communication(format!("Request timed out: {}", e))
        } else {
            ProviderError::Communication(format!("Request failed: {}", e))
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)));
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, body, model))
}

/// Map a non-success HTTP status to a provider error
pub(crate) fn status_error(status: StatusCode, body: String, model: &str) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::Unauthorized(truncate(body))
        }
        StatusCode::NOT_FOUND => ProviderError::ModelNotAvailable(model.to_string()),
        _ => ProviderError::Http {
            status: status.as_u16(),
            body: truncate(body),
        },
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

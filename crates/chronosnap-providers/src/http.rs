//! Shared request plumbing for the three API clients.

use serde::de::DeserializeOwned;

use crate::error::{ProviderError, ProviderResult};

/// Sends a prepared GET request and parses the JSON response.
///
/// Maps transport failures and non-success statuses onto the
/// [`ProviderError`] taxonomy, tagged with the calling API's name.
pub(crate) async fn get_json<T: DeserializeOwned>(
    api: &'static str,
    request: reqwest::RequestBuilder,
) -> ProviderResult<T> {
    let response = request.send().await.map_err(|e| {
        let err = if e.is_timeout() {
            ProviderError::network("request timeout")
        } else if e.is_connect() {
            ProviderError::network(format!("connection failed: {}", e))
        } else {
            ProviderError::network(format!("request failed: {}", e))
        };
        err.with_api(api)
    })?;

    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(
            ProviderError::authentication("access token expired or invalid").with_api(api),
        );
    }

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::authorization("access denied").with_api(api));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        ))
        .with_api(api));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::server(format!("API error ({}): {}", status, body)).with_api(api));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)).with_api(api))?;

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e)).with_api(api)
    })
}

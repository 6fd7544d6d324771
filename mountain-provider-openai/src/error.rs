//! Internal error helpers for mapping HTTP/reqwest errors to [`ProviderError`].

use mountain_types::ProviderError;

/// Map an HTTP status code to a [`ProviderError`].
///
/// OpenAI-style error bodies (`{"error": {"message": ...}}`) are reduced to
/// their message; anything else is passed through verbatim.
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let message = error_message(body);
    match status.as_u16() {
        401 | 403 => ProviderError::AuthFailed(message),
        404 => ProviderError::ModelNotFound(message),
        429 => ProviderError::RateLimited,
        400 | 422 => ProviderError::InvalidRequest(message),
        500 | 502 | 503 | 504 => ProviderError::ServiceUnavailable(message),
        _ => ProviderError::RequestFailed(format!("HTTP {status}: {message}")),
    }
}

/// Extract `error.message` from a JSON error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Map a [`reqwest::Error`] to a [`ProviderError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::RequestFailed(format!("timed out: {err}"))
    } else {
        ProviderError::RequestFailed(err.to_string())
    }
}

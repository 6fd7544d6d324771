//! HTTP error type rendered as `{"detail": ...}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A request that ends in an error response.
///
/// The body is always `{"detail": <message>}`, the shape the bundled browser
/// client reads.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed or rejected by policy.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A file the response depends on is missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator failed while handling the request.
    #[error("internal error: {0}")]
    Internal(String),

    /// The response took longer than the configured limit.
    #[error("timed out: {0}")]
    Timeout(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// The message sent as `detail`.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m)
            | ApiError::Timeout(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), detail = self.detail(), "mountain.http.error");
        } else {
            tracing::debug!(status = status.as_u16(), detail = self.detail(), "mountain.http.rejected");
        }
        let body = Json(serde_json::json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Timeout("x".into()).status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn body_is_bare_detail() {
        let response = ApiError::Internal("ERR! Missing required parameters.".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "detail": "ERR! Missing required parameters." })
        );
    }
}

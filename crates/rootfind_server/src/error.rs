//! API error type and its JSON rendering
//!
//! Every failure leaves the server as `{"error": "..."}` with a non-2xx status.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rootfind_core::types::SolverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
}

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine rejected the request or failed to produce a result
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Request is well-formed JSON but semantically invalid
    #[error("{0}")]
    BadRequest(String),

    /// Body is not valid JSON for the endpoint
    #[error("Invalid request body: {}", .0.body_text())]
    Json(#[from] JsonRejection),

    /// Worker task panicked or was cancelled
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Solver(SolverError::Parse(_) | SolverError::InvalidRange(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Solver(SolverError::NoStableRegion { .. } | SolverError::Domain(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::BadRequest(_) | ApiError::Json(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %error, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %error, "request rejected");
        }

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// `Json` extractor whose rejection renders as [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use rootfind_core::types::{DomainError, ParseError};

    async fn body_of(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_status_codes() {
        let parse: ApiError = SolverError::from(ParseError::at(2, "unexpected '*'")).into();
        assert_eq!(parse.status_code(), StatusCode::BAD_REQUEST);

        let range: ApiError = SolverError::invalid_range("a must differ from b").into();
        assert_eq!(range.status_code(), StatusCode::BAD_REQUEST);

        let unstable: ApiError = SolverError::NoStableRegion { x0: 1.0 }.into();
        assert_eq!(unstable.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let domain: ApiError = SolverError::from(DomainError::NonFinite { x: 0.0 }).into();
        assert_eq!(domain.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("join".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_parse_error_body_keeps_position() {
        let err: ApiError = SolverError::from(ParseError::at(3, "unexpected '*'")).into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Parse error at position 3: unexpected '*'");
    }

    #[tokio::test]
    async fn test_no_stable_region_body() {
        let (status, body) = body_of(SolverError::NoStableRegion { x0: 2.0 }.into()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.error.contains("x0 = 2"));
    }

    #[tokio::test]
    async fn test_internal_error_body() {
        let (status, body) = body_of(ApiError::Internal("worker cancelled".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.error.contains("worker cancelled"));
    }
}

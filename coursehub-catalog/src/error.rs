//! HTTP error responses for coursehub-catalog

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::AiGatewayError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// AI gateway unreachable or returned garbage (502)
    #[error("AI gateway error: {0}")]
    AiGateway(#[from] AiGatewayError),

    /// coursehub-common error
    #[error("Common error: {0}")]
    Common(#[from] coursehub_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use coursehub_common::Error as CommonError;

        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::AiGateway(ref err) => {
                tracing::warn!(error = %err, "AI gateway request failed");
                (StatusCode::BAD_GATEWAY, "AI_GATEWAY_ERROR", err.to_string())
            }
            ApiError::Common(CommonError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(CommonError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => {
                tracing::error!(error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Common(coursehub_common::Error::NotFound("m-1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Common(coursehub_common::Error::InvalidInput("title".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Common(coursehub_common::Error::Internal("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::AiGateway(AiGatewayError::MissingApiKey),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}

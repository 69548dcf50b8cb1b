//! API error types and JSON error response formatting.
//!
//! ApiError gives every endpoint the same `{error, message}` JSON body and
//! maps engine errors to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use carebot_consult::ConsultError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 404 Not Found - unknown session.
    NotFound(String),
    /// 413 Payload Too Large - recording over the upload limit.
    PayloadTooLarge(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
    /// 502 Bad Gateway - the model or speech service failed.
    BadGateway(String),
    /// 503 Service Unavailable - feature not enabled.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConsultError> for ApiError {
    fn from(err: ConsultError) -> Self {
        match err {
            ConsultError::EmptyMessage => ApiError::BadRequest(err.to_string()),
            ConsultError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            ConsultError::Model(_) | ConsultError::Synthesis(_) | ConsultError::Recognition(_) => {
                ApiError::BadGateway(err.to_string())
            }
            ConsultError::Config(_) | ConsultError::State(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_consult_error_status_mapping() {
        let cases = [
            (ConsultError::EmptyMessage, StatusCode::BAD_REQUEST),
            (ConsultError::SessionNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (ConsultError::Model("quota".into()), StatusCode::BAD_GATEWAY),
            (ConsultError::Synthesis("down".into()), StatusCode::BAD_GATEWAY),
            (ConsultError::State("poisoned".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let resp = ApiError::from(err).into_response();
            assert_eq!(resp.status(), status);
        }
    }
}

//! Application error type mapping to HTTP status codes and the JSON error body.
//!
//! Every failure becomes `{"error": "..."}`; upstream non-2xx replies also
//! carry the upstream body under `"details"`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use palaver_types::error::{HistoryError, RelayError};

/// Stable message for request bodies that are not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON in request body";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Completion relay errors.
    Relay(RelayError),
    /// History store errors.
    History(HistoryError),
    /// Request body is not parseable JSON.
    InvalidJson,
    /// Request body parsed but has the wrong structure.
    Validation(String),
    /// Route exists but not for this method.
    MethodNotAllowed,
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl From<HistoryError> for AppError {
    fn from(e: HistoryError) -> Self {
        AppError::History(e)
    }
}

impl AppError {
    /// Status code, error message and optional details for this error.
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        match self {
            AppError::Relay(RelayError::InvalidRequest(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::Relay(RelayError::UpstreamTimeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "AI API timeout".to_string(), None)
            }
            AppError::Relay(RelayError::UpstreamUnreachable { detail }) => (
                StatusCode::BAD_GATEWAY,
                format!("AI API request failed: {detail}"),
                None,
            ),
            AppError::Relay(RelayError::UpstreamError { status, body }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("AI API error: {status}"),
                Some(body.clone()),
            ),
            AppError::Relay(RelayError::Internal(detail)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, detail.clone(), None)
            }
            AppError::History(HistoryError::InvalidRequest(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            AppError::History(HistoryError::StoreUnavailable(detail))
            | AppError::History(HistoryError::Store(detail)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, detail.clone(), None)
            }
            AppError::InvalidJson => {
                (StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE.to_string(), None)
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = match details {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

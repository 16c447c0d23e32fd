//! HTTP request handlers for the REST API.

pub mod completion;
pub mod history;

use crate::http::error::AppError;

/// Fallback for a known route hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

//! Lenient JSON body extractor.
//!
//! Unlike `axum::Json`, this does not require a `Content-Type` header and
//! treats an empty body as `{}`. Syntax errors map to the stable
//! "Invalid JSON in request body" message; structurally wrong bodies map to
//! a validation error.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::http::error::AppError;

/// Deserialized JSON request body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read request body: {e}")))?;
        parse_body(&bytes).map(JsonBody)
    }
}

/// Parse raw body bytes, reading a blank body as `{}`.
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    serde_json::from_slice(bytes).map_err(|e| match e.classify() {
        Category::Data => AppError::Validation(format!("Invalid request body: {e}")),
        Category::Syntax | Category::Eof | Category::Io => AppError::InvalidJson,
    })
}

//! Completion relay HTTP handler.
//!
//! Endpoint:
//! - POST /api/v1/completion - Relay one message upstream and return the reply

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::extractors::{JsonBody, REQUEST_ID_HEADER, RequestId};
use crate::state::AppState;

/// Request body for POST /completion.
#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    pub message: Option<String>,
}

/// Response body for a successful completion.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub response: String,
    pub request_id: String,
}

/// POST /api/v1/completion - Relay a message to the upstream model.
pub async fn complete(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(body): JsonBody<CompletionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let relay = state.relay()?;
    let message = body.message.unwrap_or_default();

    let result = relay.complete(&message, &request_id).await?;

    Ok((
        [(REQUEST_ID_HEADER, result.correlation_id.clone())],
        Json(CompletionResponse {
            response: result.content,
            request_id: result.correlation_id,
        }),
    ))
}

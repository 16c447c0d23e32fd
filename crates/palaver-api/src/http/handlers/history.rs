//! Chat history HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/history - List every stored message, oldest first
//! - POST   /api/v1/history - Append one message
//! - DELETE /api/v1/history - Remove every message
//!
//! The store is checked before the body is read, so an unconfigured
//! database reports 500 regardless of what the request carries.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use palaver_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::http::extractors::parse_body;
use crate::state::AppState;

/// Request body for POST /history.
#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub role: Option<String>,
    pub content: Option<String>,
}

/// One message as returned by GET /history.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: String,
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

impl From<ChatMessage> for MessageView {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            role: message.role,
            content: message.content,
            timestamp: message
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryListing {
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
pub struct AppendReceipt {
    pub id: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ClearStatus {
    pub status: &'static str,
}

/// GET /api/v1/history - List all messages in ascending insertion order.
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<HistoryListing>, AppError> {
    let history = state.history()?;
    let messages = history.list_all().await?;

    Ok(Json(HistoryListing {
        messages: messages.into_iter().map(MessageView::from).collect(),
    }))
}

/// POST /api/v1/history - Append a message.
pub async fn append_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AppendReceipt>), AppError> {
    let history = state.history()?;
    let request: AppendMessageRequest = parse_body(&body)?;

    let receipt = history
        .append(
            request.role.as_deref().unwrap_or_default(),
            request.content.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AppendReceipt {
            id: receipt.id.to_string(),
            created_at: receipt
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }),
    ))
}

/// DELETE /api/v1/history - Remove every message.
pub async fn clear_messages(
    State(state): State<AppState>,
) -> Result<Json<ClearStatus>, AppError> {
    let history = state.history()?;
    history.clear_all().await?;

    Ok(Json(ClearStatus { status: "cleared" }))
}

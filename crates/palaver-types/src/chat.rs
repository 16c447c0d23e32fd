//! Chat history types for Palaver.
//!
//! A [`ChatMessage`] is one persisted conversational turn. Messages are
//! append-only: the store assigns `id` and `created_at` at insertion time and
//! nothing is ever updated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conventional role tag for messages written by the human.
pub const ROLE_USER: &str = "user";

/// Conventional role tag for messages produced by the model.
pub const ROLE_ASSISTANT: &str = "assistant";

/// A single persisted chat turn.
///
/// `role` is free-form: the store accepts any non-empty string and does not
/// check it against [`ROLE_USER`] / [`ROLE_ASSISTANT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    /// Store-assigned insertion time; the ordering key for reads.
    pub created_at: DateTime<Utc>,
}

/// What the store hands back after a successful append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Returns `true` when `value` carries at least one non-whitespace character.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

//! Completion relay result type.

use serde::{Deserialize, Serialize};

/// A normalized upstream reply, tagged with the request that produced it.
///
/// Never persisted. A caller that wants the reply in the history appends it
/// as a separate [`ChatMessage`](crate::chat::ChatMessage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// Flat text extracted from whatever shape the upstream returned.
    pub content: String,
    /// Identifier of the inbound request, echoed for traceability.
    pub correlation_id: String,
}

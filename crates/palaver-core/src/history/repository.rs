//! HistoryRepository trait definition.
//!
//! Three operations over one durable, append-only, ordered collection.
//! Follows the same RPITIT pattern as the relay's `CompletionUpstream`.

use palaver_types::chat::{ChatMessage, MessageReceipt};
use palaver_types::error::RepositoryError;

/// Repository trait for chat history persistence.
///
/// Implementations live in palaver-infra (e.g., `SqliteHistoryRepository`).
/// Each method is a single atomic unit of work; there is no transaction
/// spanning calls.
pub trait HistoryRepository: Send + Sync {
    /// Every stored message, ordered by `created_at` ASC with insertion order
    /// breaking ties.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Store a new message. The repository assigns `id` and `created_at`.
    ///
    /// The row must be visible to the next `list_all` once this returns.
    fn append(
        &self,
        role: &str,
        content: &str,
    ) -> impl std::future::Future<Output = Result<MessageReceipt, RepositoryError>> + Send;

    /// Delete every message. Returns the number of rows removed.
    fn clear_all(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

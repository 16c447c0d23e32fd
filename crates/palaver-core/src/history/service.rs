//! History service: input validation and error mapping in front of a
//! [`HistoryRepository`].

use palaver_types::chat::{ChatMessage, MessageReceipt, is_present};
use palaver_types::error::HistoryError;
use tracing::{debug, info};

use super::repository::HistoryRepository;

/// Manages the chat history lifecycle: list, append, clear.
///
/// Generic over `HistoryRepository` to maintain clean architecture
/// (palaver-core never depends on palaver-infra).
pub struct HistoryService<R: HistoryRepository> {
    repo: R,
}

impl<R: HistoryRepository> HistoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    #[cfg(test)]
    fn repo(&self) -> &R {
        &self.repo
    }

    /// All messages in display order. An empty store yields an empty vec.
    pub async fn list_all(&self) -> Result<Vec<ChatMessage>, HistoryError> {
        let messages = self.repo.list_all().await?;
        debug!(count = messages.len(), "History listed");
        Ok(messages)
    }

    /// Append a message after checking both fields carry text.
    ///
    /// Blank input fails with [`HistoryError::InvalidRequest`] without
    /// touching the repository.
    pub async fn append(&self, role: &str, content: &str) -> Result<MessageReceipt, HistoryError> {
        if !is_present(role) || !is_present(content) {
            return Err(HistoryError::InvalidRequest(
                "Role and content required".to_string(),
            ));
        }

        let receipt = self.repo.append(role, content).await?;
        debug!(id = %receipt.id, role, "Message appended");
        Ok(receipt)
    }

    /// Remove every message. Irreversible.
    pub async fn clear_all(&self) -> Result<u64, HistoryError> {
        let removed = self.repo.clear_all().await?;
        info!(removed, "History cleared");
        Ok(removed)
    }
}

//! Completion relay service.
//!
//! Validates the inbound message, makes one upstream call and normalizes
//! the reply. The relay never reads or writes the history store.

use palaver_types::chat::is_present;
use palaver_types::completion::CompletionResult;
use palaver_types::error::RelayError;
use tracing::{Instrument, debug, info_span, warn};

use super::normalize::ReplyShape;
use super::upstream::CompletionUpstream;

/// Forwards user messages to a [`CompletionUpstream`].
///
/// Stateless apart from the upstream handle, so one instance can be shared
/// across concurrent requests behind an `Arc`.
pub struct RelayService<U: CompletionUpstream> {
    upstream: U,
}

impl<U: CompletionUpstream> RelayService<U> {
    pub fn new(upstream: U) -> Self {
        Self { upstream }
    }

    #[cfg(test)]
    fn upstream(&self) -> &U {
        &self.upstream
    }

    /// Relay `message` upstream and return the normalized reply.
    ///
    /// Fails with [`RelayError::InvalidRequest`] before any network call when
    /// the message is empty or whitespace-only. Upstream failures are passed
    /// through unchanged; nothing is retried.
    pub async fn complete(
        &self,
        message: &str,
        correlation_id: &str,
    ) -> Result<CompletionResult, RelayError> {
        if !is_present(message) {
            return Err(RelayError::InvalidRequest("Message is required".to_string()));
        }

        let span = info_span!(
            "relay.complete",
            correlation_id = %correlation_id,
            upstream = %self.upstream.name(),
        );

        async move {
            let payload = self.upstream.send(message).await.inspect_err(|e| {
                warn!(error = %e, "Upstream call failed");
            })?;

            let shape = ReplyShape::classify(&payload);
            debug!(shape = shape.name(), "Upstream reply normalized");

            Ok(CompletionResult {
                content: shape.into_content()?,
                correlation_id: correlation_id.to_string(),
            })
        }
        .instrument(span)
        .await
    }
}

//! CompletionUpstream trait definition.
//!
//! The port the relay talks to. Implementations live in palaver-infra
//! (e.g., `HttpUpstream`); tests use in-memory fakes.

use palaver_types::error::RelayError;
use serde_json::Value;

/// A remote completion API that answers one message with one JSON payload.
///
/// Implementations make exactly one attempt per call and classify transport
/// failures into the [`RelayError`] upstream variants. They return the raw
/// decoded payload; shape handling belongs to [`super::normalize`].
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait CompletionUpstream: Send + Sync {
    /// Short identifier for logs (e.g., the endpoint host).
    fn name(&self) -> &str;

    /// Send `message` upstream and return the decoded JSON reply.
    fn send(
        &self,
        message: &str,
    ) -> impl std::future::Future<Output = Result<Value, RelayError>> + Send;
}

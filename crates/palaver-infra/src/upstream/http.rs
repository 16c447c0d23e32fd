//! HttpUpstream -- concrete [`CompletionUpstream`] over HTTPS with reqwest.
//!
//! Sends `{"message": ...}` as JSON to the configured endpoint with an
//! `X-api-key` header. One attempt per call, bounded by the configured
//! timeout. Idle connections are not pooled, so nothing outlives the call.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the request header.

use palaver_core::relay::upstream::CompletionUpstream;
use palaver_types::config::UpstreamConfig;
use palaver_types::error::RelayError;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

/// Header carrying the upstream credential.
const API_KEY_HEADER: &str = "X-api-key";

/// Upstream completion endpoint reached over HTTP.
pub struct HttpUpstream {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    api_key: Option<SecretString>,
}

// HttpUpstream does NOT derive Debug; the client and key stay out of logs.

impl HttpUpstream {
    /// Build an upstream from configuration.
    ///
    /// Fails with [`RelayError::Internal`] when no endpoint is configured or
    /// the endpoint is not a valid URL.
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| RelayError::Internal("upstream endpoint not configured".to_string()))?;
        let endpoint = reqwest::Url::parse(url)
            .map_err(|e| RelayError::Internal(format!("invalid upstream url '{url}': {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl CompletionUpstream for HttpUpstream {
    fn name(&self) -> &str {
        self.endpoint.host_str().unwrap_or("upstream")
    }

    async fn send(&self, message: &str) -> Result<Value, RelayError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "message": message }));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }

        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("failed to read upstream error body: {e}"));
            return Err(RelayError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RelayError::Internal(format!("invalid upstream reply: {e}")))
    }
}

/// Map a reqwest failure onto the relay's timeout / unreachable split.
fn transport_error(e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        RelayError::UpstreamTimeout
    } else {
        RelayError::UpstreamUnreachable {
            detail: e.to_string(),
        }
    }
}

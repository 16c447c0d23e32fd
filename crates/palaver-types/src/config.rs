//! Service configuration types for Palaver.
//!
//! `ServiceConfig` is the deserialized form of `palaver.toml`. It is built
//! once at startup and handed to each component explicitly; nothing reads the
//! process environment after that.

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream completion API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Endpoint the relay POSTs to. `None` leaves the relay unconfigured.
    #[serde(default)]
    pub url: Option<String>,

    /// Sent as the `X-api-key` header. Never logged.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Shortest timeout the relay will use; `0` would fail every call.
pub const MIN_TIMEOUT_SECS: u64 = 1;

impl UpstreamConfig {
    /// Per-call timeout, clamped to at least [`MIN_TIMEOUT_SECS`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// History store settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// sqlx connection string, e.g. `sqlite://palaver.db?mode=rwc`.
    #[serde(default)]
    pub database_url: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

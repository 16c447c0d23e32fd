//! Service configuration loader for Palaver.
//!
//! Reads `palaver.toml` and deserializes it into [`ServiceConfig`], then lets
//! environment variables override individual fields. Falls back to defaults
//! when the file is missing or malformed.

use std::path::Path;

use palaver_types::config::ServiceConfig;
use secrecy::SecretString;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "palaver.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PALAVER_CONFIG";

pub const UPSTREAM_URL_ENV: &str = "PALAVER_UPSTREAM_URL";
pub const UPSTREAM_API_KEY_ENV: &str = "PALAVER_UPSTREAM_API_KEY";
pub const UPSTREAM_TIMEOUT_ENV: &str = "PALAVER_UPSTREAM_TIMEOUT_SECS";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const HOST_ENV: &str = "PALAVER_HOST";
pub const PORT_ENV: &str = "PALAVER_PORT";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_service_config(path: &Path) -> ServiceConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ServiceConfig::default()
        }
    }
}

/// Apply environment overrides on top of a file-loaded config.
///
/// `lookup` is `std::env::var` in production; tests pass a closure over a map.
/// Empty values are ignored. Unparseable numbers log a warning and keep the
/// file value.
pub fn apply_env_overrides<F>(mut config: ServiceConfig, lookup: F) -> ServiceConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(UPSTREAM_URL_ENV) {
        config.upstream.url = Some(url);
    }
    if let Some(key) = get(UPSTREAM_API_KEY_ENV) {
        config.upstream.api_key = Some(SecretString::from(key));
    }
    if let Some(raw) = get(UPSTREAM_TIMEOUT_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(secs) => config.upstream.timeout_secs = secs,
            Err(err) => tracing::warn!("Ignoring {UPSTREAM_TIMEOUT_ENV}={raw}: {err}"),
        }
    }
    if let Some(url) = get(DATABASE_URL_ENV) {
        config.store.database_url = Some(url);
    }
    if let Some(host) = get(HOST_ENV) {
        config.server.host = host;
    }
    if let Some(raw) = get(PORT_ENV) {
        match raw.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring {PORT_ENV}={raw}: {err}"),
        }
    }

    config
}

/// Load `path` and apply overrides from the process environment.
pub async fn resolve_service_config(path: &Path) -> ServiceConfig {
    let config = load_service_config(path).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

//! Application state wiring the relay and history services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over their upstream/repository traits, but AppState
//! pins them to the concrete infra implementations.
//!
//! Either service may be absent when its configuration is missing. Requests
//! that need an absent service fail with a 500 before any work is attempted.

use std::sync::Arc;

use anyhow::Context;
use palaver_core::history::service::HistoryService;
use palaver_core::relay::service::RelayService;
use palaver_infra::sqlite::history::SqliteHistoryRepository;
use palaver_infra::sqlite::pool::DatabasePool;
use palaver_infra::upstream::HttpUpstream;
use palaver_types::config::ServiceConfig;
use palaver_types::error::{HistoryError, RelayError};

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteRelayService = RelayService<HttpUpstream>;

pub type ConcreteHistoryService = HistoryService<SqliteHistoryRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Option<Arc<ConcreteRelayService>>,
    pub history: Option<Arc<ConcreteHistoryService>>,
    pub db_pool: Option<DatabasePool>,
}

impl AppState {
    /// Initialize the application state from resolved configuration.
    ///
    /// A missing upstream URL or database URL leaves that service unset.
    /// A value that is present but unusable fails startup.
    pub async fn init(config: &ServiceConfig) -> anyhow::Result<Self> {
        let relay = match config.upstream.url {
            Some(_) => {
                let upstream = HttpUpstream::new(&config.upstream)
                    .context("invalid upstream configuration")?;
                tracing::info!(endpoint = upstream.endpoint(), "Completion upstream configured");
                Some(RelayService::new(upstream))
            }
            None => {
                tracing::warn!("No upstream endpoint configured; completion requests will fail");
                None
            }
        };

        let db_pool = match config.store.database_url.as_deref() {
            Some(url) => Some(
                DatabasePool::new(url)
                    .await
                    .context("failed to open history store")?,
            ),
            None => {
                tracing::warn!("DATABASE_URL not set; history requests will fail");
                None
            }
        };

        Ok(Self::new(relay, db_pool))
    }

    /// Wire state from already-built parts.
    pub fn new(relay: Option<ConcreteRelayService>, db_pool: Option<DatabasePool>) -> Self {
        let history = db_pool
            .clone()
            .map(|pool| Arc::new(HistoryService::new(SqliteHistoryRepository::new(pool))));

        Self {
            relay: relay.map(Arc::new),
            history,
            db_pool,
        }
    }

    /// The completion relay, or an internal error when no upstream is configured.
    pub fn relay(&self) -> Result<&ConcreteRelayService, RelayError> {
        self.relay
            .as_deref()
            .ok_or_else(|| RelayError::Internal("upstream endpoint not configured".to_string()))
    }

    /// The history service, or `StoreUnavailable` when no database is configured.
    pub fn history(&self) -> Result<&ConcreteHistoryService, HistoryError> {
        self.history
            .as_deref()
            .ok_or_else(|| HistoryError::StoreUnavailable("Database not configured".to_string()))
    }

    /// Close database connections, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
        }
    }
}

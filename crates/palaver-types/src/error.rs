use thiserror::Error;

/// Errors from the completion relay.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("upstream unreachable: {detail}")]
    UpstreamUnreachable { detail: String },

    #[error("upstream returned HTTP {status}")]
    UpstreamError { status: u16, body: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from the history store service.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("store error: {0}")]
    Store(String),
}

/// Errors from repository operations (used by trait definitions in palaver-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

impl From<RepositoryError> for HistoryError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Connection(detail) => HistoryError::StoreUnavailable(detail),
            RepositoryError::Query(detail) => HistoryError::Store(detail),
        }
    }
}

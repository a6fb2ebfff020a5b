use thiserror::Error;

use triage_engine::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot not found: {path}")]
    NotFound { path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store is closed")]
    Closed,
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(e) => RepositoryError::Query(e.to_string()),
            other => RepositoryError::Unavailable(other.to_string()),
        }
    }
}

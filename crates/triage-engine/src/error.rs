use std::time::Duration;

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("failed to load capability clusters: {0}")]
    ClusterLoad(String),

    #[error("invalid vitals: {0}")]
    InvalidVitals(triage_core::error::CoreError),

    #[error("vitals classifier failed: {0}")]
    VitalsClassifier(#[from] ClassifierError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("repository call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid configuration: {0}")]
    Config(String),
}

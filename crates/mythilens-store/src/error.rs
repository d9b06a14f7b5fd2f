use mythilens_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("background write failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("no profile for user {0:?}")]
    ProfileNotFound(String),

    #[error("no contribution with id {0}")]
    ContributionNotFound(u64),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<tempfile::PersistError> for StoreError {
    fn from(e: tempfile::PersistError) -> Self {
        StoreError::Io(e.error)
    }
}

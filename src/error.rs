use crate::scorer::interface::ScorerError;
use crate::upload::UploadError;
use thiserror::Error;

/// Errors surfaced to the user. Every variant is recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("scorer unavailable: {0}")]
    ScorerUnavailable(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("invalid input image: {0}")]
    InvalidInputImage(#[from] UploadError),
    #[error("no image selected")]
    NoImage,
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<ScorerError> for AppError {
    fn from(error: ScorerError) -> Self {
        match error {
            ScorerError::ModelUnavailable(message) => AppError::ScorerUnavailable(message),
            ScorerError::NotLoaded => AppError::ScorerUnavailable("model is not loaded".to_string()),
            ScorerError::InferenceFailed(message) => AppError::InferenceFailed(message),
        }
    }
}

use catchlog_core::error::CoreError;

/// Error type for review workflow operations.
///
/// Domain failures (`NotFound`, `Validation`, `Conflict`) arrive as
/// [`CoreError`]. Storage failures are transient: the caller may retry, and
/// the sweep retries finalization on its own.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Transient storage error: {0}")]
    TransientStorage(#[from] sqlx::Error),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

impl ReviewError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ReviewError::TransientStorage(_))
    }
}

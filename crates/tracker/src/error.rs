use thiserror::Error;

/// Unified error type for pipeline operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Referenced record is missing; terminal, nothing to process.
    #[error("{0}")]
    NotFound(String),

    /// Feed download or parse failure, propagated unretried.
    #[error("Feed error: {0}")]
    Feed(#[from] feed::FeedError),

    /// Storage failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Everything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

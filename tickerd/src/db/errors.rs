//! Unified error type for the storage layer.
//!
//! Application code only ever sees these shapes; sqlx error details are
//! categorized here and never leak past the `db` module boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Entity not found by the given identifier
    #[error("record not found")]
    NotFound,

    /// The backing store is temporarily unreachable or overloaded.
    /// Callers may retry with backoff.
    #[error("storage temporarily unavailable: {0}")]
    Unavailable(String),

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for storage operation results
pub type Result<T> = std::result::Result<T, StoreError>;

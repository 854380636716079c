//! Store error types.

use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Game ID not usable as a storage key
    #[error("Invalid game id: {0:?}")]
    InvalidId(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

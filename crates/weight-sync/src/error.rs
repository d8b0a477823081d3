//! Error types for weight sync.

use thiserror::Error;

/// Errors that can occur while talking to the weight store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The record to delete does not exist.
    #[error("weight record not found: {0}")]
    NotFound(String),

    /// Store-specific failure.
    #[error("store error: {0}")]
    Store(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

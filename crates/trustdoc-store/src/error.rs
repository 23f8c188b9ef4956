//! Error types for result persistence

use thiserror::Error;

/// Errors that can occur while writing or reading results
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid store configuration
    #[error("Invalid store configuration: {0}")]
    Config(String),

    /// Stored file does not hold a result
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Every candidate name was already taken
    #[error("No free artifact name for '{0}' after {1} attempts")]
    NameExhausted(String, u32),
}

//! Error types for the persistence layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for persistence operations
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors that can occur while loading or saving a dataset
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O errors (open, write, rename)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The dataset file exists but does not hold a dataset object
    #[error("Corrupt dataset at {path:?}: {reason}")]
    Corruption { path: PathBuf, reason: String },
}

impl PersistenceError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new corruption error
    pub fn corruption(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corruption { path: path.into(), reason: reason.into() }
    }
}

//! Store error types.

use std::fmt;

/// Store operation errors.
#[derive(Debug)]
pub enum StoreError {
    /// Connection to the store backend failed.
    Connection(String),
    /// Persisted data could not be (de)serialized.
    Serialization(String),
    /// Reading or writing the backing file failed.
    Io(String),
    /// Invalid store configuration.
    Configuration(String),
    /// Internal store error.
    Internal(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "store connection error: {msg}"),
            Self::Serialization(msg) => write!(f, "store serialization error: {msg}"),
            Self::Io(msg) => write!(f, "store I/O error: {msg}"),
            Self::Configuration(msg) => write!(f, "store configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "internal store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

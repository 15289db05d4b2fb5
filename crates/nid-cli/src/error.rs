//! CLI error types.

use nid_ident::IdentError;
use nid_store::StoreError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Nothing is recorded under the given key.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Type of record.
        resource_type: String,
        /// Lookup key.
        id: String,
    },

    /// Identifier service error.
    #[error(transparent)]
    Ident(#[from] IdentError),

    /// Store error while opening the backend.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<nid_core::Error> for CliError {
    fn from(err: nid_core::Error) -> Self {
        match err {
            nid_core::Error::Io(e) => Self::Io(e),
            other => Self::Config(other.to_string()),
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

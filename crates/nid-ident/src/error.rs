//! Identifier service errors.
//!
//! Protocol-level failures (`UnknownEntity`, `PolicyViolation`) are meant to
//! be turned into SAML fault responses by the caller; [`IdentError::status_code`]
//! gives the status URIs to use.

use nid_saml::{status_codes, sub_status_codes};
use nid_store::StoreError;
use thiserror::Error;

/// Result type for identifier operations.
pub type IdentResult<T> = Result<T, IdentError>;

/// Identifier service errors.
#[derive(Debug, Error)]
pub enum IdentError {
    /// No local principal is linked to the given NameID.
    #[error("unknown entity: no local id is linked to {0}")]
    UnknownEntity(String),

    /// The requester's policy forbids the action that would be needed.
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// Neither a requester policy nor a local policy decides the NameID format.
    #[error("unable to determine the NameID format: no usable requester or local policy")]
    PolicyUndetermined,

    /// The service is not configured for the requested operation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The NameID cannot be linked.
    #[error("invalid NameID: {0}")]
    InvalidNameId(String),

    /// A persisted token does not follow the `idx=value,...` format.
    #[error("malformed token {token:?}: {reason}")]
    MalformedToken {
        /// The offending token.
        token: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A persisted record could not be decoded.
    #[error("corrupt record under {key}: {reason}")]
    CorruptRecord {
        /// Store key of the record.
        key: String,
        /// Decoding failure.
        reason: String,
    },

    /// Backing store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IdentError {
    /// Returns the top-level SAML status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) | Self::PolicyViolation(_) | Self::InvalidNameId(_) => {
                status_codes::REQUESTER
            }
            _ => status_codes::RESPONDER,
        }
    }

    /// Returns the second-level SAML status code, if one applies.
    #[must_use]
    pub const fn sub_status_code(&self) -> Option<&'static str> {
        match self {
            Self::UnknownEntity(_) => Some(sub_status_codes::UNKNOWN_PRINCIPAL),
            Self::PolicyViolation(_) | Self::PolicyUndetermined => {
                Some(sub_status_codes::INVALID_NAMEID_POLICY)
            }
            _ => None,
        }
    }

    /// Returns true for errors caused by the request rather than the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntity(_) | Self::PolicyViolation(_) | Self::InvalidNameId(_)
        )
    }
}

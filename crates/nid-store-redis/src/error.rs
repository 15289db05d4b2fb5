//! Redis error conversion.

use nid_store::StoreError;

/// Converts a `fred` Redis error to a `StoreError`.
#[allow(clippy::needless_pass_by_value)]
pub fn from_redis_error(err: fred::error::Error) -> StoreError {
    match err.kind() {
        fred::error::ErrorKind::IO | fred::error::ErrorKind::Timeout => {
            StoreError::Connection(err.to_string())
        }
        fred::error::ErrorKind::Config | fred::error::ErrorKind::Url => {
            StoreError::Configuration(err.to_string())
        }
        fred::error::ErrorKind::Parse => StoreError::Serialization(err.to_string()),
        _ => StoreError::Internal(err.to_string()),
    }
}

//! # nid-store
//!
//! Key-value store abstraction for the NameID link store.
//!
//! Keys and values are plain strings. The link store keeps three key
//! families in one key space (forward lists, reverse entries, published
//! records) and only needs the primitives of [`KeyValueStore`].
//!
//! ## Implementations
//!
//! - [`InMemoryStore`] - process-local map, for tests and ephemeral setups
//! - [`FileStore`] - JSON file on local disk
//!
//! A Redis implementation lives in `nid-store-redis`.
//!
//! ## Example
//!
//! ```ignore
//! use nid_store::{InMemoryStore, KeyValueStore};
//!
//! let store = InMemoryStore::new();
//! store.set("alice", "0=idp,2=urn%3Aformat").await?;
//! assert!(store.contains("alice").await?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod memory;
pub mod provider;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use provider::KeyValueStore;

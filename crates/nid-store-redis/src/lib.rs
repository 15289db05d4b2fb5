//! # nid-store-redis
//!
//! Redis implementation of [`nid_store::KeyValueStore`] using the `fred` crate.
//!
//! Several link-store processes can share one Redis database.
//! `insert_if_absent` maps to `SET NX`, so a fresh reverse index entry is
//! created exactly once.
//!
//! ## Example
//!
//! ```ignore
//! use nid_store_redis::{RedisStore, RedisStoreConfig};
//!
//! let store = RedisStore::connect(RedisStoreConfig::new("redis://127.0.0.1:6379/0")).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod provider;

pub use config::RedisStoreConfig;
pub use provider::RedisStore;

//! # nid-core
//!
//! Configuration and error handling shared by the NameID link crates.
//!
//! The configuration covers the three things the identifier core consumes
//! from the outside world:
//!
//! - the identity settings (email domain, default name qualifier, generator cap)
//! - the backing key-value store
//! - the local NameID format policy

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{Config, IdentConfig, PolicyConfig, SpPolicyConfig, StoreBackend, StoreConfig};
pub use error::{Error, Result};

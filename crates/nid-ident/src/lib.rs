//! # nid-ident
//!
//! Durable links between local principals and the SAML NameIDs issued to
//! them.
//!
//! ## Components
//!
//! - [`token`] - the `idx=value,...` token codec for a NameID's qualifiers
//! - [`IdGenerator`] - random, store-unique identifier values
//! - [`LinkStore`] - forward lists, reverse index and published records
//! - [`policy`] - format and qualifier resolution
//! - [`IdentDb`] - issuance plus the NameID mapping and management handlers
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nid_ident::IdentDb;
//! use nid_saml::NameIdFormat;
//! use nid_store::InMemoryStore;
//!
//! let db = IdentDb::new(Arc::new(InMemoryStore::new()), config.ident.clone());
//! let name_id = db
//!     .get_nameid("alice", NameIdFormat::Persistent.uri(), Some("https://sp"), None)
//!     .await?;
//! assert_eq!(db.find_local_id(&name_id).await?.as_deref(), Some("alice"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod ident;
pub mod link;
pub mod policy;
pub mod token;

pub use error::{IdentError, IdentResult};
pub use generator::{IdGenerator, OsSeedSource, SeedSource};
pub use ident::{ConstructRequest, IdentDb, ManageNameIdRequest};
pub use link::{LinkStore, LinkWriter};
pub use policy::{LocalPolicy, NameIdArgs, StaticLocalPolicy};
pub use token::{Qualifiers, TokenField};

//! SAML 2.0 NameID data model.
//!
//! The identifier core only needs a small slice of SAML: the `NameID`
//! element with its qualifying attributes, the `NameIDPolicy` a requester
//! sends along, the format URIs, and the status codes the protocol layer
//! answers with when a request cannot be served.
//!
//! - [`types`] - NameID, NameIDPolicy, format and status URIs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

pub use types::*;

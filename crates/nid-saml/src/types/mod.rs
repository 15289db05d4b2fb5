//! SAML NameID types and constants.

mod constants;
mod name_id;

pub use constants::*;
pub use name_id::*;

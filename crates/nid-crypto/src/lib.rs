//! # nid-crypto
//!
//! Cryptographic primitives used when minting NameID values.
//!
//! - [`random`] - CSPRNG seeds
//! - [`hash`] - incremental SHA-256 rendered as lowercase hex

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod hash;
pub mod random;

pub use hash::{sha256_hex, HexDigest};
pub use random::{random_seed, seeded_sequence, SEED_LEN};

//! Incremental hashing for identifier values.

use aws_lc_rs::digest;

/// An incremental SHA-256 computation producing a lowercase hex digest.
pub struct HexDigest {
    context: digest::Context,
}

impl HexDigest {
    /// Starts a new SHA-256 computation.
    #[must_use]
    pub fn sha256() -> Self {
        Self {
            context: digest::Context::new(&digest::SHA256),
        }
    }

    /// Feeds more input into the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.context.update(data);
    }

    /// Finishes the computation and renders it as lowercase hex.
    #[must_use]
    pub fn finish_hex(self) -> String {
        hex::encode(self.context.finish().as_ref())
    }
}

/// Computes the SHA-256 of `data` as lowercase hex.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    let mut digest = HexDigest::sha256();
    digest.update(data);
    digest.finish_hex()
}

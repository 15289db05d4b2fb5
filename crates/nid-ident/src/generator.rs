//! Identifier value generation.
//!
//! A candidate is `hex(sha256(seed || format || name_qualifier || sp_name_qualifier))`
//! with a fresh 32-byte random seed per attempt; absent qualifiers are
//! skipped. A candidate that already exists as a key in the store is thrown
//! away and a new seed drawn. Without a configured cap the loop runs until a
//! free candidate turns up, which in practice is the first attempt.

use std::fmt;

use nid_crypto::{HexDigest, SEED_LEN};
use nid_store::KeyValueStore;

use crate::error::{IdentError, IdentResult};

/// Source of generator seeds.
pub trait SeedSource: Send + Sync {
    /// Returns a fresh seed.
    fn next_seed(&self) -> [u8; SEED_LEN];
}

/// Seeds drawn from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSeedSource;

impl SeedSource for OsSeedSource {
    fn next_seed(&self) -> [u8; SEED_LEN] {
        nid_crypto::random_seed()
    }
}

/// Computes the candidate identifier for one seed.
#[must_use]
pub fn candidate_id(
    seed: &[u8; SEED_LEN],
    format: &str,
    name_qualifier: Option<&str>,
    sp_name_qualifier: Option<&str>,
) -> String {
    let mut digest = HexDigest::sha256();
    digest.update(seed);
    digest.update(format.as_bytes());
    if let Some(qualifier) = name_qualifier.filter(|q| !q.is_empty()) {
        digest.update(qualifier.as_bytes());
    }
    if let Some(qualifier) = sp_name_qualifier.filter(|q| !q.is_empty()) {
        digest.update(qualifier.as_bytes());
    }
    digest.finish_hex()
}

/// Generates store-unique identifier values.
pub struct IdGenerator {
    seeds: Box<dyn SeedSource>,
    max_attempts: Option<u32>,
}

impl IdGenerator {
    /// Creates a generator seeded from the OS, retrying without limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed_source(OsSeedSource)
    }

    /// Creates a generator drawing seeds from `seeds`.
    #[must_use]
    pub fn with_seed_source(seeds: impl SeedSource + 'static) -> Self {
        Self {
            seeds: Box::new(seeds),
            max_attempts: None,
        }
    }

    /// Caps the number of attempts. `None` retries without limit.
    #[must_use]
    pub const fn max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Generates a value that is not currently a key in `store`.
    ///
    /// The result is only guaranteed unique if the caller holds the link
    /// store write lock until the value has been written.
    ///
    /// ## Errors
    ///
    /// Returns `IdentError::Configuration` if the attempt cap is exhausted,
    /// or a store error if the existence check fails.
    pub async fn create_id<S>(
        &self,
        store: &S,
        format: &str,
        name_qualifier: Option<&str>,
        sp_name_qualifier: Option<&str>,
    ) -> IdentResult<String>
    where
        S: KeyValueStore + ?Sized,
    {
        let mut attempts: u32 = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(IdentError::Configuration(format!(
                        "no unused identifier found after {attempts} attempts"
                    )));
                }
            }
            attempts += 1;

            let seed = self.seeds.next_seed();
            let id = candidate_id(&seed, format, name_qualifier, sp_name_qualifier);
            if !store.contains(&id).await? {
                tracing::debug!(attempts, "generated identifier");
                return Ok(id);
            }
            tracing::warn!(attempts, "generated identifier collides with a store key, retrying");
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

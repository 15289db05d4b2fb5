//! Cryptographically secure random seeds.

use rand::{Rng, SeedableRng};

/// Length in bytes of a generator seed.
pub const SEED_LEN: usize = 32;

/// Generates a fresh random seed for identifier generation.
///
/// Uses the thread-local generator, which is a CSPRNG seeded from the OS.
#[must_use]
pub fn random_seed() -> [u8; SEED_LEN] {
    let mut seed = [0u8; SEED_LEN];
    rand::rng().fill(&mut seed);
    seed
}

/// Derives a deterministic sequence of seeds (for testing only).
///
/// Not suitable for production identifiers: anyone holding `root` can
/// reproduce every seed.
#[must_use]
pub fn seeded_sequence(root: [u8; SEED_LEN], count: usize) -> Vec<[u8; SEED_LEN]> {
    let mut rng = rand::rngs::StdRng::from_seed(root);
    (0..count)
        .map(|_| {
            let mut seed = [0u8; SEED_LEN];
            rng.fill(&mut seed);
            seed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_seeds_differ() {
        assert_ne!(random_seed(), random_seed());
    }

    #[test]
    fn seeded_sequence_is_deterministic() {
        let a = seeded_sequence([7u8; SEED_LEN], 3);
        let b = seeded_sequence([7u8; SEED_LEN], 3);
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }
}

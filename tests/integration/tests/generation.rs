//! Identifier generation against a populated store.

use std::sync::Mutex;

use nid_crypto::SEED_LEN;
use nid_ident::generator::candidate_id;
use nid_ident::{IdGenerator, IdentError, SeedSource};
use nid_saml::NameIdFormat;
use nid_store::{InMemoryStore, KeyValueStore};

use crate::common::TestEnv;

/// Hands out the given seeds in order, then keeps repeating the last one.
struct ScriptedSeeds(Mutex<Vec<[u8; SEED_LEN]>>);

impl ScriptedSeeds {
    fn new(mut seeds: Vec<[u8; SEED_LEN]>) -> Self {
        seeds.reverse();
        Self(Mutex::new(seeds))
    }
}

impl SeedSource for ScriptedSeeds {
    fn next_seed(&self) -> [u8; SEED_LEN] {
        let mut seeds = self.0.lock().unwrap();
        if seeds.len() > 1 {
            seeds.pop().unwrap()
        } else {
            seeds[0]
        }
    }
}

#[tokio::test]
async fn create_id_skips_a_preinserted_candidate() -> anyhow::Result<()> {
    let format = NameIdFormat::Persistent.uri();
    let seeds = nid_crypto::seeded_sequence([0x11; SEED_LEN], 2);
    let (first, second) = (seeds[0], seeds[1]);
    let colliding = candidate_id(&first, format, Some("nq1"), Some("sp1"));

    let store = InMemoryStore::new();
    store.set(&colliding, "someone-else").await?;

    let generator = IdGenerator::with_seed_source(ScriptedSeeds::new(vec![first, second]));
    let id = generator
        .create_id(&store, format, Some("nq1"), Some("sp1"))
        .await?;

    assert_ne!(id, colliding);
    assert_eq!(id, candidate_id(&second, format, Some("nq1"), Some("sp1")));
    assert!(!store.contains(&id).await?);
    Ok(())
}

#[tokio::test]
async fn capped_generator_gives_up_with_configuration_error() -> anyhow::Result<()> {
    let format = NameIdFormat::Persistent.uri();
    let seed = [0x33; SEED_LEN];
    let store = InMemoryStore::with_entries([(candidate_id(&seed, format, None, None), "x")]);

    let generator =
        IdGenerator::with_seed_source(ScriptedSeeds::new(vec![seed])).max_attempts(Some(5));
    let result = generator.create_id(&store, format, None, None).await;
    assert!(matches!(result, Err(IdentError::Configuration(_))));
    Ok(())
}

#[tokio::test]
async fn issued_values_are_never_existing_keys() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        for i in 0..20 {
            let before = env.snapshot().await;
            let sp = format!("sp{i}");
            let name_id = env
                .db
                .get_nameid("u1", NameIdFormat::Persistent.uri(), Some(&sp), Some("nq1"))
                .await?;
            assert!(!before.contains_key(&name_id.value), "{}", env.name());
            assert_eq!(name_id.value.len(), 64);
            assert!(name_id.value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
    Ok(())
}

#[tokio::test]
async fn email_identifiers_use_the_configured_domain() -> anyhow::Result<()> {
    let env = TestEnv::memory();
    let name_id = env
        .db
        .get_nameid("u1", NameIdFormat::Email.uri(), Some("sp1"), None)
        .await?;
    let (local, domain) = name_id
        .value
        .split_once('@')
        .ok_or_else(|| anyhow::anyhow!("no domain in {}", name_id.value))?;
    assert_eq!(local.len(), 64);
    assert_eq!(domain, "example.org");
    Ok(())
}

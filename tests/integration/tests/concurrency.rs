//! Concurrent writers against one link store.

use std::collections::HashSet;
use std::sync::Arc;

use nid_ident::IdentError;
use nid_saml::NameIdFormat;

use crate::common::{persistent_for, TestEnv};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_issuance_keeps_indexes_consistent() -> anyhow::Result<()> {
    let env = Arc::new(TestEnv::memory());

    let mut handles = Vec::new();
    for i in 0..32 {
        let env = Arc::clone(&env);
        handles.push(tokio::spawn(async move {
            let user = format!("u{}", i % 4);
            let sp = format!("sp{i}");
            env.db
                .get_nameid(&user, NameIdFormat::Persistent.uri(), Some(&sp), Some("nq1"))
                .await
        }));
    }

    let mut values = HashSet::new();
    for handle in handles {
        let name_id = handle.await??;
        assert!(values.insert(name_id.value));
    }

    let snapshot = env.snapshot().await;
    let mut linked = 0;
    for user in ["u0", "u1", "u2", "u3"] {
        let tokens = env.db.links().tokens(user).await?;
        assert_eq!(tokens.len(), 8);
        for token in tokens {
            assert_eq!(snapshot.get(&token).map(String::as_str), Some(user));
            linked += 1;
        }
    }
    assert_eq!(linked, 32);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_principals_at_one_sp_all_get_name_ids() -> anyhow::Result<()> {
    let env = Arc::new(TestEnv::file().await?);
    let shared = persistent_for("sp1");

    let mut handles = Vec::new();
    for i in 0..8 {
        let env = Arc::clone(&env);
        handles.push(tokio::spawn(async move {
            let user = format!("u{i}");
            let name_id = env
                .db
                .get_nameid(&user, NameIdFormat::Persistent.uri(), Some("sp1"), Some("nq1"))
                .await?;
            Ok::<_, IdentError>((user, name_id))
        }));
    }

    let mut values = HashSet::new();
    let mut users = Vec::new();
    for handle in handles {
        let (user, name_id) = handle.await??;
        assert!(values.insert(name_id.value));
        users.push(user);
    }

    for user in &users {
        assert_eq!(env.db.links().tokens(user).await?.len(), 1);
    }
    let owner = env
        .db
        .find_local_id(&shared)
        .await?
        .ok_or_else(|| anyhow::anyhow!("shared token has no reverse entry"))?;
    assert!(users.contains(&owner));
    Ok(())
}

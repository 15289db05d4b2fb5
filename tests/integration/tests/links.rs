//! Link store scenarios: forward lists, reverse index, published records.

use nid_ident::token;
use nid_saml::{NameId, NameIdFormat};
use nid_store::FileStore;

use crate::common::{persistent_for, temp_file, TestEnv};

const PERSISTENT_ENCODED: &str =
    "urn%3Aoasis%3Anames%3Atc%3ASAML%3A2.0%3Anameid-format%3Apersistent";

#[tokio::test]
async fn stored_name_id_resolves_to_its_owner() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let name_id = persistent_for("sp1");
        env.db.store("u1", &name_id).await?;
        assert_eq!(
            env.db.find_local_id(&name_id).await?.as_deref(),
            Some("u1"),
            "{}",
            env.name()
        );
        assert_eq!(
            env.db.find_local_id(&persistent_for("sp2")).await?,
            None,
            "{}",
            env.name()
        );
    }
    Ok(())
}

#[tokio::test]
async fn store_and_remove_remote_scenario() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let name_id = persistent_for("sp1");
        let expected = format!("0=nq1,1=sp1,2={PERSISTENT_ENCODED}");
        assert_eq!(token::encode(&name_id), expected);

        env.db.store("u1", &name_id).await?;
        let snapshot = env.snapshot().await;
        assert_eq!(snapshot.get("u1"), Some(&expected), "{}", env.name());
        assert_eq!(snapshot.get(&expected).map(String::as_str), Some("u1"));

        env.db.remove_remote(&name_id).await?;
        let snapshot = env.snapshot().await;
        assert!(!snapshot.contains_key("u1"), "{}", env.name());
        assert!(!snapshot.contains_key(&expected), "{}", env.name());

        // Re-delivered revocation is a no-op.
        env.db.remove_remote(&name_id).await?;
    }
    Ok(())
}

#[tokio::test]
async fn remove_local_leaves_no_reference_to_the_principal() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        for sp in ["sp1", "sp2", "sp3"] {
            env.db.store("u1", &persistent_for(sp)).await?;
        }
        env.db
            .store("u1", &NameId::transient("t").with_sp_name_qualifier("sp1"))
            .await?;
        env.db.store("u2", &persistent_for("sp4")).await?;

        env.db.remove_local("u1").await?;

        let snapshot = env.snapshot().await;
        assert!(!snapshot.contains_key("u1"), "{}", env.name());
        assert!(snapshot.values().all(|owner| owner != "u1"), "{}", env.name());
        assert_eq!(
            env.db.find_local_id(&persistent_for("sp4")).await?.as_deref(),
            Some("u2")
        );

        env.db.remove_local("u1").await?;
    }
    Ok(())
}

#[tokio::test]
async fn every_forward_token_has_a_matching_reverse_entry() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        for (user, sp) in [("u1", "sp1"), ("u1", "sp2"), ("u2", "sp3"), ("u1", "sp4")] {
            env.db.store(user, &persistent_for(sp)).await?;
        }
        env.db.remove_remote(&persistent_for("sp2")).await?;

        for user in ["u1", "u2"] {
            for token in env.db.links().tokens(user).await? {
                let owner = env.snapshot().await.get(&token).cloned();
                assert_eq!(owner.as_deref(), Some(user), "{}", env.name());
            }
        }
        assert_eq!(env.db.links().tokens("u1").await?.len(), 2);
    }
    Ok(())
}

#[tokio::test]
async fn publish_keeps_the_last_write() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let n1 = NameId::persistent("first").with_sp_name_qualifier("sp1");
        let n2 = NameId::new("second@example.org")
            .with_format(NameIdFormat::Email)
            .with_sp_name_qualifier("sp1");

        env.db.publish("u1", "sp1", &n1).await?;
        env.db.publish("u1", "sp1", &n2).await?;

        assert_eq!(env.db.published("u1", "sp1").await?, Some(n2), "{}", env.name());
        assert_eq!(env.db.published("u1", "sp2").await?, None);
        assert_eq!(env.db.published("u2", "sp1").await?, None);
    }
    Ok(())
}

#[tokio::test]
async fn file_store_links_survive_reopen() -> anyhow::Result<()> {
    let path = temp_file();
    let name_id = persistent_for("sp1");

    {
        let store = FileStore::open(path.clone()).await?;
        let links = nid_ident::LinkStore::new(std::sync::Arc::new(store));
        links.store("u1", &name_id).await?;
        links.publish("u1", "sp1", &name_id).await?;
    }

    let store = FileStore::open(path.clone()).await?;
    let links = nid_ident::LinkStore::new(std::sync::Arc::new(store));
    assert_eq!(links.local_id_for(&name_id).await?.as_deref(), Some("u1"));
    assert_eq!(links.published("u1", "sp1").await?, Some(name_id));

    std::fs::remove_file(&path)?;
    Ok(())
}

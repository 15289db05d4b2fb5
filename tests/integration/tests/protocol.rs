//! NameID mapping and management requests.

use nid_ident::{ConstructRequest, IdentError, ManageNameIdRequest, StaticLocalPolicy};
use nid_saml::{status_codes, sub_status_codes, NameId, NameIdFormat, NameIdPolicy};

use crate::common::{persistent_for, TestEnv};

#[tokio::test]
async fn mapping_returns_existing_match_without_allocating() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let presented = persistent_for("sp1");
        env.db.store("u1", &presented).await?;
        env.db.store("u1", &persistent_for("sp2")).await?;
        let before = env.snapshot().await;

        let policy = NameIdPolicy::with_format(NameIdFormat::Persistent)
            .sp_name_qualifier("sp2")
            .allow_create(false);
        let mapped = env.db.handle_name_id_mapping_request(&presented, &policy).await?;

        assert_eq!(mapped.sp_name_qualifier.as_deref(), Some("sp2"), "{}", env.name());
        assert_eq!(mapped.name_qualifier.as_deref(), Some("nq1"));
        assert_eq!(env.snapshot().await, before, "{}", env.name());
    }
    Ok(())
}

#[tokio::test]
async fn mapping_without_match_respects_allow_create() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let presented = persistent_for("sp1");
        env.db.store("u1", &presented).await?;

        let forbidden = NameIdPolicy::with_format(NameIdFormat::Persistent)
            .sp_name_qualifier("sp9")
            .allow_create(false);
        let err = env
            .db
            .handle_name_id_mapping_request(&presented, &forbidden)
            .await
            .unwrap_err();
        assert!(matches!(err, IdentError::PolicyViolation(_)), "{}", env.name());
        assert_eq!(err.sub_status_code(), Some(sub_status_codes::INVALID_NAMEID_POLICY));

        let allowed = NameIdPolicy::with_format(NameIdFormat::Persistent).sp_name_qualifier("sp9");
        let created = env.db.handle_name_id_mapping_request(&presented, &allowed).await?;
        assert_eq!(created.sp_name_qualifier.as_deref(), Some("sp9"));
        assert_eq!(created.name_qualifier.as_deref(), Some("https://idp.example.org"));
        assert_eq!(env.db.find_local_id(&created).await?.as_deref(), Some("u1"));

        // The new link now satisfies the same request without another allocation.
        let again = env.db.handle_name_id_mapping_request(&presented, &forbidden).await?;
        assert_eq!(again.sp_name_qualifier.as_deref(), Some("sp9"));
        assert_eq!(env.db.links().tokens("u1").await?.len(), 2);
    }
    Ok(())
}

#[tokio::test]
async fn requests_for_unlinked_name_ids_are_unknown_principals() -> anyhow::Result<()> {
    let env = TestEnv::memory();
    let stranger = persistent_for("sp1");

    let err = env
        .db
        .handle_name_id_mapping_request(&stranger, &NameIdPolicy::with_format(NameIdFormat::Persistent))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentError::UnknownEntity(_)));
    assert_eq!(err.status_code(), status_codes::REQUESTER);
    assert_eq!(err.sub_status_code(), Some(sub_status_codes::UNKNOWN_PRINCIPAL));

    let err = env
        .db
        .handle_manage_name_id_request(&stranger, &ManageNameIdRequest::new_id("alias"))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentError::UnknownEntity(_)));
    Ok(())
}

#[tokio::test]
async fn manage_request_edits_the_sp_provided_id_in_place() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let original = persistent_for("sp1");
        env.db.store("u1", &original).await?;
        env.db.store("u1", &persistent_for("sp2")).await?;

        let aliased = env
            .db
            .handle_manage_name_id_request(&original, &ManageNameIdRequest::new_id("sp-alias"))
            .await?;
        assert_eq!(aliased.sp_provided_id.as_deref(), Some("sp-alias"));
        assert_eq!(env.db.find_local_id(&aliased).await?.as_deref(), Some("u1"), "{}", env.name());
        assert_eq!(env.db.find_local_id(&original).await?, None);

        let terminated = env
            .db
            .handle_manage_name_id_request(&aliased, &ManageNameIdRequest::terminate())
            .await?;
        assert_eq!(terminated.sp_provided_id, None);
        assert_eq!(env.db.find_local_id(&terminated).await?.as_deref(), Some("u1"));
        assert_eq!(env.db.find_local_id(&aliased).await?, None);
        assert_eq!(env.db.links().tokens("u1").await?.len(), 2, "{}", env.name());
    }
    Ok(())
}

#[tokio::test]
async fn construct_follows_policy_precedence() -> anyhow::Result<()> {
    let env = TestEnv::memory();
    let local = StaticLocalPolicy::new(NameIdFormat::Persistent.uri())
        .with_sp("https://mail.example.org", NameIdFormat::Email.uri());

    let by_local_policy = env
        .db
        .construct_nameid(
            "u1",
            &ConstructRequest {
                local_policy: Some(&local),
                sp_name_qualifier: Some("https://mail.example.org"),
                ..ConstructRequest::default()
            },
        )
        .await?;
    assert_eq!(by_local_policy.format.as_deref(), Some(NameIdFormat::Email.uri()));
    assert!(by_local_policy.value.ends_with("@example.org"));

    let requested = NameIdPolicy::with_format(NameIdFormat::Transient).sp_name_qualifier("https://other.example.org");
    let by_requester = env
        .db
        .construct_nameid(
            "u1",
            &ConstructRequest {
                local_policy: Some(&local),
                sp_name_qualifier: Some("https://mail.example.org"),
                name_id_policy: Some(&requested),
                name_qualifier: Some("https://tenant.example.org"),
            },
        )
        .await?;
    assert_eq!(by_requester.format.as_deref(), Some(NameIdFormat::Transient.uri()));
    assert_eq!(by_requester.sp_name_qualifier.as_deref(), Some("https://other.example.org"));
    assert_eq!(by_requester.name_qualifier.as_deref(), Some("https://tenant.example.org"));

    let undetermined = env.db.construct_nameid("u1", &ConstructRequest::default()).await;
    assert!(matches!(undetermined, Err(IdentError::PolicyUndetermined)));
    Ok(())
}

#[tokio::test]
async fn match_local_id_ignores_transient_links() -> anyhow::Result<()> {
    for env in TestEnv::all().await? {
        let transient = NameId::transient("t")
            .with_name_qualifier("nq1")
            .with_sp_name_qualifier("sp1");
        env.db.store("u1", &transient).await?;
        assert_eq!(env.db.match_local_id("u1", Some("sp1"), Some("nq1")).await?, None);

        env.db.store("u1", &persistent_for("sp1")).await?;
        let matched = env
            .db
            .match_local_id("u1", Some("sp1"), Some("nq1"))
            .await?
            .ok_or_else(|| anyhow::anyhow!("no match on {}", env.name()))?;
        assert_eq!(matched.format.as_deref(), Some(NameIdFormat::Persistent.uri()));
    }
    Ok(())
}

//! NameID issuance and the two NameID protocol handlers.

use std::sync::Arc;

use nid_core::IdentConfig;
use nid_saml::{NameId, NameIdFormat, NameIdPolicy};
use nid_store::KeyValueStore;

use crate::error::{IdentError, IdentResult};
use crate::generator::IdGenerator;
use crate::link::{LinkStore, LinkWriter};
use crate::policy::{self, LocalPolicy, NameIdArgs};
use crate::token;

/// Inputs to [`IdentDb::construct_nameid`] besides the local id.
#[derive(Clone, Copy, Default)]
pub struct ConstructRequest<'a> {
    /// Server-side format policy.
    pub local_policy: Option<&'a dyn LocalPolicy>,
    /// SP name qualifier supplied by the caller.
    pub sp_name_qualifier: Option<&'a str>,
    /// The requester's `NameIDPolicy`.
    pub name_id_policy: Option<&'a NameIdPolicy>,
    /// Name qualifier supplied by the caller.
    pub name_qualifier: Option<&'a str>,
}

/// The change requested by a `ManageNameIDRequest`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManageNameIdRequest {
    /// `NewID`: the SP's new alias for the principal.
    pub new_id: Option<String>,
    /// `NewEncryptedID`. Not supported; accepted as a no-op.
    pub new_encrypted_id: Option<String>,
    /// `Terminate`: drop the SP's alias.
    pub terminate: bool,
}

impl ManageNameIdRequest {
    /// Request replacing the SP-provided id.
    #[must_use]
    pub fn new_id(id: impl Into<String>) -> Self {
        Self {
            new_id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Request clearing the SP-provided id.
    #[must_use]
    pub fn terminate() -> Self {
        Self {
            terminate: true,
            ..Self::default()
        }
    }

    fn action(&self) -> ManageAction<'_> {
        if let Some(id) = self.new_id.as_deref().filter(|id| !id.is_empty()) {
            ManageAction::NewId(id)
        } else if self.new_encrypted_id.as_deref().is_some_and(|id| !id.is_empty()) {
            ManageAction::NewEncryptedId
        } else if self.terminate {
            ManageAction::Terminate
        } else {
            ManageAction::NoOp
        }
    }
}

enum ManageAction<'a> {
    NewId(&'a str),
    NewEncryptedId,
    Terminate,
    NoOp,
}

/// Issues NameIDs and answers NameID mapping and management requests
/// against a [`LinkStore`].
pub struct IdentDb<S: ?Sized> {
    config: IdentConfig,
    generator: IdGenerator,
    links: LinkStore<S>,
}

impl<S> IdentDb<S>
where
    S: KeyValueStore + ?Sized,
{
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<S>, config: IdentConfig) -> Self {
        let generator = IdGenerator::new().max_attempts(config.max_id_attempts);
        Self {
            config,
            generator,
            links: LinkStore::new(store),
        }
    }

    /// Replaces the identifier generator.
    #[must_use]
    pub fn with_generator(mut self, generator: IdGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Returns the identity configuration.
    #[must_use]
    pub const fn config(&self) -> &IdentConfig {
        &self.config
    }

    /// Returns the underlying link store.
    #[must_use]
    pub const fn links(&self) -> &LinkStore<S> {
        &self.links
    }

    /// Generates an identifier value not currently used as a store key.
    ///
    /// The value is not reserved. Use [`IdentDb::get_nameid`] to generate and
    /// link in one step.
    pub async fn create_id(
        &self,
        format: &str,
        name_qualifier: Option<&str>,
        sp_name_qualifier: Option<&str>,
    ) -> IdentResult<String> {
        self.generator
            .create_id(
                &**self.links.backend(),
                format,
                name_qualifier,
                sp_name_qualifier,
            )
            .await
    }

    /// Issues a fresh NameID of `format` to `local_id` and links it.
    ///
    /// ## Errors
    ///
    /// Returns `IdentError::Configuration` for the email-address format when
    /// no domain is configured.
    pub async fn get_nameid(
        &self,
        local_id: &str,
        format: &str,
        sp_name_qualifier: Option<&str>,
        name_qualifier: Option<&str>,
    ) -> IdentResult<NameId> {
        let args = NameIdArgs {
            format: format.to_string(),
            sp_name_qualifier: sp_name_qualifier
                .filter(|sp| !sp.is_empty())
                .map(str::to_string),
            name_qualifier: name_qualifier
                .filter(|nq| !nq.is_empty())
                .map(str::to_string),
        };
        let mut writer = self.links.write().await;
        self.issue(&mut writer, local_id, &args).await
    }

    /// Resolves the effective format and qualifiers for a request, using the
    /// configured default name qualifier.
    pub fn nameid_args(&self, request: &ConstructRequest<'_>) -> IdentResult<NameIdArgs> {
        policy::resolve(
            request.local_policy,
            request.sp_name_qualifier,
            request.name_id_policy,
            request.name_qualifier,
            self.config.name_qualifier(),
        )
    }

    /// Resolves the effective parameters, then issues and links a NameID.
    pub async fn construct_nameid(
        &self,
        local_id: &str,
        request: &ConstructRequest<'_>,
    ) -> IdentResult<NameId> {
        let args = self.nameid_args(request)?;
        let mut writer = self.links.write().await;
        self.issue(&mut writer, local_id, &args).await
    }

    async fn issue(
        &self,
        writer: &mut LinkWriter<'_, S>,
        local_id: &str,
        args: &NameIdArgs,
    ) -> IdentResult<NameId> {
        let domain = match NameIdFormat::from_uri(&args.format) {
            Some(NameIdFormat::Email) => Some(self.config.domain().ok_or_else(|| {
                IdentError::Configuration(
                    "email-address NameIDs require a configured domain".to_string(),
                )
            })?),
            _ => None,
        };

        let id = self
            .generator
            .create_id(
                writer.backend(),
                &args.format,
                args.name_qualifier.as_deref(),
                args.sp_name_qualifier.as_deref(),
            )
            .await?;
        let value = match domain {
            Some(domain) => format!("{id}@{domain}"),
            None => id,
        };

        let name_id = NameId {
            value,
            format: Some(args.format.clone()),
            name_qualifier: args.name_qualifier.clone(),
            sp_name_qualifier: args.sp_name_qualifier.clone(),
            sp_provided_id: None,
        };
        writer.store(local_id, &name_id).await?;
        Ok(name_id)
    }

    /// Returns the local id `name_id` is linked to, if any.
    pub async fn find_local_id(&self, name_id: &NameId) -> IdentResult<Option<String>> {
        let local_id = self.links.local_id_for(name_id).await?;
        tracing::debug!(found = local_id.is_some(), "find_local_id");
        Ok(local_id)
    }

    /// Returns the first non-transient NameID issued to `local_id` whose
    /// qualifiers equal the requested ones.
    pub async fn match_local_id(
        &self,
        local_id: &str,
        sp_name_qualifier: Option<&str>,
        name_qualifier: Option<&str>,
    ) -> IdentResult<Option<NameId>> {
        let sp_name_qualifier = sp_name_qualifier.filter(|sp| !sp.is_empty());
        let name_qualifier = name_qualifier.filter(|nq| !nq.is_empty());

        Ok(self.links.name_ids(local_id).await?.into_iter().find(|nid| {
            !nid.is_transient()
                && nid.sp_name_qualifier.as_deref() == sp_name_qualifier
                && nid.name_qualifier.as_deref() == name_qualifier
        }))
    }

    /// Answers a `NameIDMappingRequest`.
    ///
    /// Returns an existing NameID of the owner matching the policy's format
    /// and SP name qualifier, or issues a new one under the policy. Returned
    /// NameIDs that were already on record carry no value.
    ///
    /// ## Errors
    ///
    /// - `IdentError::UnknownEntity` if `name_id` is not linked
    /// - `IdentError::PolicyViolation` if a new NameID is needed and the
    ///   policy sets `AllowCreate="false"`
    pub async fn handle_name_id_mapping_request(
        &self,
        name_id: &NameId,
        name_id_policy: &NameIdPolicy,
    ) -> IdentResult<NameId> {
        let local_id = self
            .find_local_id(name_id)
            .await?
            .ok_or_else(|| IdentError::UnknownEntity(token::encode(name_id)))?;

        let existing = self.links.name_ids(&local_id).await?.into_iter().find(|nid| {
            nid.format == name_id_policy.format
                && nid.sp_name_qualifier == name_id_policy.sp_name_qualifier
        });
        if let Some(existing) = existing {
            tracing::debug!(%local_id, "mapping request matched an existing NameID");
            return Ok(existing);
        }

        if name_id_policy.forbids_creation() {
            return Err(IdentError::PolicyViolation(
                "not allowed to create a new identifier".to_string(),
            ));
        }

        let request = ConstructRequest {
            name_id_policy: Some(name_id_policy),
            ..ConstructRequest::default()
        };
        let created = self.construct_nameid(&local_id, &request).await?;
        tracing::info!(%local_id, "mapping request issued a new NameID");
        Ok(created)
    }

    /// Answers a `ManageNameIDRequest` by setting or clearing the NameID's
    /// SP-provided id and relinking it under the same owner.
    ///
    /// Returns the NameID as now recorded.
    ///
    /// ## Errors
    ///
    /// Returns `IdentError::UnknownEntity` if `name_id` is not linked, even
    /// when the request asks for no change.
    pub async fn handle_manage_name_id_request(
        &self,
        name_id: &NameId,
        request: &ManageNameIdRequest,
    ) -> IdentResult<NameId> {
        let mut writer = self.links.write().await;

        let original_token = token::encode(name_id);
        let local_id = writer
            .owner_of(&original_token)
            .await?
            .ok_or_else(|| IdentError::UnknownEntity(original_token.clone()))?;

        let mut updated = name_id.clone();
        match request.action() {
            ManageAction::NewId(id) => updated.sp_provided_id = Some(id.to_string()),
            ManageAction::Terminate => updated.sp_provided_id = None,
            ManageAction::NewEncryptedId => {
                tracing::warn!(%local_id, "NewEncryptedID is not supported, ignoring");
                return Ok(updated);
            }
            ManageAction::NoOp => return Ok(updated),
        }

        if token::encode(&updated) == original_token {
            return Ok(updated);
        }

        let forward = writer.forward_value(&local_id).await?;
        writer.remove_remote(name_id).await?;
        if let Err(e) = writer.store(&local_id, &updated).await {
            // A rejected update leaves the forward list exactly as it was.
            writer
                .restore(&local_id, forward.as_deref(), &original_token)
                .await?;
            return Err(e);
        }

        tracing::info!(%local_id, "updated SP-provided id");
        Ok(updated)
    }

    /// Links `name_id` to `local_id`.
    pub async fn store(&self, local_id: &str, name_id: &NameId) -> IdentResult<()> {
        self.links.store(local_id, name_id).await
    }

    /// Unlinks one NameID. A NameID that is not linked is ignored.
    pub async fn remove_remote(&self, name_id: &NameId) -> IdentResult<()> {
        self.links.remove_remote(name_id).await.map(|_| ())
    }

    /// Unlinks every NameID issued to `local_id`.
    pub async fn remove_local(&self, local_id: &str) -> IdentResult<()> {
        self.links.remove_local(local_id).await
    }

    /// Records the NameID last published to a relying party.
    pub async fn publish(
        &self,
        local_id: &str,
        relying_party_id: &str,
        name_id: &NameId,
    ) -> IdentResult<()> {
        self.links.publish(local_id, relying_party_id, name_id).await
    }

    /// Returns the NameID last published to a relying party.
    pub async fn published(
        &self,
        local_id: &str,
        relying_party_id: &str,
    ) -> IdentResult<Option<NameId>> {
        self.links.published(local_id, relying_party_id).await
    }
}

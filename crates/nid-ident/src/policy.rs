//! NameID format and qualifier resolution.
//!
//! Precedence:
//!
//! - SP name qualifier: the requester policy's, if it sets one, else the caller's.
//! - Format: the requester policy's, else the local policy's choice for the
//!   resolved SP name qualifier, else [`IdentError::PolicyUndetermined`].
//! - Name qualifier: the caller's, if non-empty, else the configured default.

use std::collections::BTreeMap;

use nid_core::PolicyConfig;
use nid_saml::NameIdPolicy;

use crate::error::{IdentError, IdentResult};

/// The local, server-side NameID policy.
pub trait LocalPolicy: Send + Sync {
    /// Returns the format URI to issue to the relying party `sp_name_qualifier`.
    fn nameid_format(&self, sp_name_qualifier: Option<&str>) -> Option<String>;
}

/// A [`LocalPolicy`] read from configuration: a default plus per-SP overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocalPolicy {
    default_format: Option<String>,
    per_sp: BTreeMap<String, String>,
}

impl StaticLocalPolicy {
    /// Creates a policy issuing `format` to every relying party.
    #[must_use]
    pub fn new(default_format: impl Into<String>) -> Self {
        Self {
            default_format: Some(default_format.into()),
            per_sp: BTreeMap::new(),
        }
    }

    /// Overrides the format for one relying party.
    #[must_use]
    pub fn with_sp(mut self, sp_name_qualifier: impl Into<String>, format: impl Into<String>) -> Self {
        self.per_sp.insert(sp_name_qualifier.into(), format.into());
        self
    }
}

impl From<&PolicyConfig> for StaticLocalPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self {
            default_format: config.default_format.clone(),
            per_sp: config
                .sp
                .iter()
                .filter_map(|(sp, entry)| entry.format.clone().map(|f| (sp.clone(), f)))
                .collect(),
        }
    }
}

impl LocalPolicy for StaticLocalPolicy {
    fn nameid_format(&self, sp_name_qualifier: Option<&str>) -> Option<String> {
        sp_name_qualifier
            .and_then(|sp| self.per_sp.get(sp))
            .or(self.default_format.as_ref())
            .cloned()
    }
}

/// Effective parameters for issuing a NameID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIdArgs {
    /// Format URI.
    pub format: String,
    /// SP name qualifier, if any.
    pub sp_name_qualifier: Option<String>,
    /// Name qualifier, if any.
    pub name_qualifier: Option<String>,
}

/// Resolves the effective format and qualifiers for a request.
///
/// A requester policy without a format falls through to the local policy.
///
/// ## Errors
///
/// Returns `IdentError::PolicyUndetermined` if no format can be decided.
pub fn resolve(
    local_policy: Option<&dyn LocalPolicy>,
    sp_name_qualifier: Option<&str>,
    name_id_policy: Option<&NameIdPolicy>,
    name_qualifier: Option<&str>,
    default_name_qualifier: Option<&str>,
) -> IdentResult<NameIdArgs> {
    let sp_name_qualifier = name_id_policy
        .and_then(|p| p.sp_name_qualifier.as_deref())
        .filter(|sp| !sp.is_empty())
        .or(sp_name_qualifier)
        .filter(|sp| !sp.is_empty())
        .map(str::to_string);

    let format = name_id_policy
        .and_then(|p| p.format.clone())
        .filter(|f| !f.is_empty())
        .or_else(|| local_policy.and_then(|lp| lp.nameid_format(sp_name_qualifier.as_deref())))
        .ok_or(IdentError::PolicyUndetermined)?;

    let name_qualifier = name_qualifier
        .filter(|nq| !nq.is_empty())
        .or(default_name_qualifier)
        .filter(|nq| !nq.is_empty())
        .map(str::to_string);

    Ok(NameIdArgs {
        format,
        sp_name_qualifier,
        name_qualifier,
    })
}

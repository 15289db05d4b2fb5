//! Configuration for the NameID link service.
//!
//! Configuration is read from TOML. Every section has defaults so an empty
//! document yields a usable in-memory setup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Identifier issuance settings.
    #[serde(default)]
    pub ident: IdentConfig,
    /// Backing store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Local NameID format policy.
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Identifier issuance settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentConfig {
    /// Domain appended to email-format identifiers.
    ///
    /// Email-format identifiers cannot be issued without it.
    pub domain: Option<String>,
    /// Name qualifier used when a request does not carry one.
    pub name_qualifier: Option<String>,
    /// Upper bound on generation attempts. `None` retries until a free value is found.
    pub max_id_attempts: Option<u32>,
}

impl IdentConfig {
    /// Returns the configured domain, treating an empty string as unset.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|d| !d.is_empty())
    }

    /// Returns the default name qualifier, treating an empty string as unset.
    #[must_use]
    pub fn name_qualifier(&self) -> Option<&str> {
        self.name_qualifier.as_deref().filter(|q| !q.is_empty())
    }
}

/// Which key-value engine backs the link store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, lost on exit.
    #[default]
    Memory,
    /// JSON file on local disk.
    File,
    /// Redis server.
    Redis,
}

/// Backing store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store engine.
    #[serde(default)]
    pub backend: StoreBackend,
    /// File path for the `file` backend.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Connection URL for the `redis` backend.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Prefix applied to every key written to Redis.
    #[serde(default)]
    pub key_prefix: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("nid-links.json")
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/0".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            redis_url: default_redis_url(),
            key_prefix: String::new(),
        }
    }
}

/// Local NameID format policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Format URI used for relying parties without an explicit entry.
    pub default_format: Option<String>,
    /// Per relying party overrides, keyed by SP name qualifier (entity id).
    #[serde(default)]
    pub sp: BTreeMap<String, SpPolicyConfig>,
}

/// Policy for a single relying party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpPolicyConfig {
    /// Format URI issued to this relying party.
    pub format: Option<String>,
}

impl Config {
    /// Parses configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {e}")))
    }

    /// Checks backend-specific requirements.
    pub fn validate(&self) -> Result<()> {
        match self.store.backend {
            StoreBackend::File if self.store.path.as_os_str().is_empty() => {
                Err(Error::config("store.path must be set for the file backend"))
            }
            StoreBackend::Redis if self.store.redis_url.trim().is_empty() => {
                Err(Error::config("store.redis_url must be set for the redis backend"))
            }
            _ => Ok(()),
        }
    }
}

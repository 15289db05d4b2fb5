//! Redis store configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for [`crate::RedisStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL, e.g. `redis://:secret@host:6379/2`.
    pub url: String,
    /// Prefix applied to every key, separated by `:`.
    #[serde(default)]
    pub key_prefix: String,
}

impl RedisStoreConfig {
    /// Creates a configuration for `url` without a key prefix.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: String::new(),
        }
    }

    /// Sets the key prefix.
    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Formats a key with the configured prefix.
    #[must_use]
    pub fn prefixed_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

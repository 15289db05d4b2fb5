//! Redis key-value store.

use async_trait::async_trait;
use fred::prelude::*;
use nid_store::{KeyValueStore, StoreError, StoreResult};

use crate::config::RedisStoreConfig;
use crate::error::from_redis_error;

/// Redis-backed key-value store.
pub struct RedisStore {
    client: Client,
    config: RedisStoreConfig,
}

impl RedisStore {
    /// Connects to Redis.
    ///
    /// ## Errors
    ///
    /// Returns an error if the URL is invalid or the connection cannot be established.
    pub async fn connect(config: RedisStoreConfig) -> StoreResult<Self> {
        let redis_config =
            Config::from_url(&config.url).map_err(|e| StoreError::Configuration(e.to_string()))?;

        let client = Client::new(
            redis_config,
            None,
            None,
            Some(ReconnectPolicy::new_exponential(0, 1000, 30_000, 2)),
        );

        client.init().await.map_err(from_redis_error)?;
        tracing::info!(prefix = %config.key_prefix, "connected to redis store");

        Ok(Self { client, config })
    }

    /// Returns the underlying Redis client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    fn key(&self, key: &str) -> String {
        self.config.prefixed_key(key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.client
            .get::<Option<String>, _>(self.key(key))
            .await
            .map_err(from_redis_error)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.client
            .set::<(), _, _>(self.key(key), value, None, None, false)
            .await
            .map_err(from_redis_error)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.client
            .del::<(), _>(self.key(key))
            .await
            .map_err(from_redis_error)
    }

    async fn contains(&self, key: &str) -> StoreResult<bool> {
        let count: i64 = self
            .client
            .exists(self.key(key))
            .await
            .map_err(from_redis_error)?;
        Ok(count > 0)
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let result: Option<String> = self
            .client
            .set(self.key(key), value, None, Some(SetOptions::NX), false)
            .await
            .map_err(from_redis_error)?;
        Ok(result.is_some())
    }
}

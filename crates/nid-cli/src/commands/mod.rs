//! Command implementations.

pub mod config;
pub mod link;
pub mod protocol;
pub mod publish;

pub use config::run_config;
pub use link::{run_construct, run_find, run_issue, run_list, run_match, run_remove_local, run_remove_remote};
pub use protocol::{run_manage, run_map};
pub use publish::{run_publish, run_published};

use std::sync::Arc;

use nid_core::{Config, StoreBackend};
use nid_ident::IdentDb;
use nid_store::{FileStore, InMemoryStore, KeyValueStore};
use nid_store_redis::{RedisStore, RedisStoreConfig};

use crate::output::warning;

/// Identifier service over whichever backend the configuration selects.
pub type Db = IdentDb<dyn KeyValueStore>;

/// Opens the configured store and wraps it in an [`IdentDb`].
pub async fn open_db(config: &Config) -> crate::CliResult<Db> {
    let store: Arc<dyn KeyValueStore> = match config.store.backend {
        StoreBackend::Memory => {
            warning("using the in-memory store; links are discarded on exit");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::File => Arc::new(FileStore::open(config.store.path.clone()).await?),
        StoreBackend::Redis => {
            let redis_config = RedisStoreConfig::new(config.store.redis_url.clone())
                .key_prefix(config.store.key_prefix.clone());
            Arc::new(RedisStore::connect(redis_config).await?)
        }
    };
    tracing::debug!(backend = ?config.store.backend, "opened link store");
    Ok(IdentDb::new(store, config.ident.clone()))
}

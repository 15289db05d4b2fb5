//! Common test utilities and fixtures.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use nid_core::IdentConfig;
use nid_ident::IdentDb;
use nid_saml::NameId;
use nid_store::{FileStore, InMemoryStore, KeyValueStore};

/// Which store a [`TestEnv`] runs against.
pub enum Backend {
    /// Process-local map.
    Memory(Arc<InMemoryStore>),
    /// JSON file in the temp directory, removed on drop.
    File(Arc<FileStore>),
}

/// Test environment: an identifier service over a fresh store.
pub struct TestEnv {
    /// The service under test.
    pub db: IdentDb<dyn KeyValueStore>,
    /// The raw store behind it.
    pub backend: Backend,
}

impl TestEnv {
    /// In-memory environment.
    pub fn memory() -> Self {
        init_tracing();
        let store = Arc::new(InMemoryStore::new());
        Self {
            db: IdentDb::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, ident_config()),
            backend: Backend::Memory(store),
        }
    }

    /// File-backed environment at a unique temp path.
    pub async fn file() -> anyhow::Result<Self> {
        init_tracing();
        let store = Arc::new(FileStore::open(temp_file()).await?);
        Ok(Self {
            db: IdentDb::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, ident_config()),
            backend: Backend::File(store),
        })
    }

    /// One environment per backend.
    pub async fn all() -> anyhow::Result<Vec<Self>> {
        Ok(vec![Self::memory(), Self::file().await?])
    }

    /// Short backend name for assertion messages.
    pub fn name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::File(_) => "file",
        }
    }

    /// Every key and value currently in the store.
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        match &self.backend {
            Backend::Memory(store) => store.snapshot().await.into_iter().collect(),
            Backend::File(store) => store.snapshot().await,
        }
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        if let Backend::File(store) = &self.backend {
            let _ = std::fs::remove_file(store.path());
        }
    }
}

/// Identity settings shared by all environments.
pub fn ident_config() -> IdentConfig {
    IdentConfig {
        domain: Some("example.org".to_string()),
        name_qualifier: Some("https://idp.example.org".to_string()),
        max_id_attempts: None,
    }
}

/// A unique path in the temp directory.
pub fn temp_file() -> PathBuf {
    std::env::temp_dir().join(format!("nid-it-{}.json", uuid::Uuid::new_v4()))
}

/// A persistent NameID for `sp` qualified by `nq1`.
pub fn persistent_for(sp: &str) -> NameId {
    NameId::persistent("opaque")
        .with_name_qualifier("nq1")
        .with_sp_name_qualifier(sp)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("nid_ident=debug,nid_store=debug")
        .with_test_writer()
        .try_init();
}

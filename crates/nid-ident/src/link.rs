//! Bidirectional link store.
//!
//! Three key families share the backing store's key space:
//!
//! | key | value |
//! |---|---|
//! | `local_id` | space-separated tokens of every NameID issued to it (forward list) |
//! | token | owning `local_id` (reverse index) |
//! | `local_id:relying_party` | JSON of the NameID last published to that party |
//!
//! Every reverse entry names a local id whose forward list holds the token.
//! Tokens carry qualifiers only, so several forward lists may hold the same
//! token; its reverse entry then names the most recent writer. Mutations of the forward list and reverse index go through
//! a [`LinkWriter`], which holds the store-wide write lock.

use std::sync::Arc;

use nid_saml::NameId;
use nid_store::KeyValueStore;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{IdentError, IdentResult};
use crate::token;

/// Separator between tokens in a forward list.
const TOKEN_SEPARATOR: char = ' ';

fn split_tokens(value: &str) -> Vec<String> {
    value
        .split(TOKEN_SEPARATOR)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_tokens(tokens: &[String]) -> String {
    tokens.join(&TOKEN_SEPARATOR.to_string())
}

fn published_key(local_id: &str, relying_party_id: &str) -> String {
    format!("{local_id}:{relying_party_id}")
}

/// Persistent mapping between local ids and the NameIDs issued to them.
pub struct LinkStore<S: ?Sized> {
    write_lock: Mutex<()>,
    store: Arc<S>,
}

impl<S> LinkStore<S>
where
    S: KeyValueStore + ?Sized,
{
    /// Wraps a store handle.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            write_lock: Mutex::new(()),
            store,
        }
    }

    /// Returns the backing store handle.
    #[must_use]
    pub const fn backend(&self) -> &Arc<S> {
        &self.store
    }

    /// Acquires the write lock.
    ///
    /// Hold the returned writer across any check-then-write sequence, such as
    /// generating an identifier and storing it.
    pub async fn write(&self) -> LinkWriter<'_, S> {
        LinkWriter {
            _guard: self.write_lock.lock().await,
            store: &*self.store,
        }
    }

    /// Returns the forward list of `local_id`, in insertion order.
    pub async fn tokens(&self, local_id: &str) -> IdentResult<Vec<String>> {
        forward_tokens(&*self.store, local_id).await
    }

    /// Decodes every NameID issued to `local_id`, in insertion order.
    ///
    /// The decoded NameIDs carry qualifiers only; their value is empty.
    pub async fn name_ids(&self, local_id: &str) -> IdentResult<Vec<NameId>> {
        self.tokens(local_id)
            .await?
            .iter()
            .map(|t| token::decode(t))
            .collect()
    }

    /// Looks up the owner of `name_id` in the reverse index.
    pub async fn local_id_for(&self, name_id: &NameId) -> IdentResult<Option<String>> {
        Ok(self.store.get(&token::encode(name_id)).await?)
    }

    /// Links `name_id` to `local_id`. See [`LinkWriter::store`].
    pub async fn store(&self, local_id: &str, name_id: &NameId) -> IdentResult<()> {
        self.write().await.store(local_id, name_id).await
    }

    /// Unlinks `name_id` from its owner. See [`LinkWriter::remove_remote`].
    pub async fn remove_remote(&self, name_id: &NameId) -> IdentResult<Option<String>> {
        self.write().await.remove_remote(name_id).await
    }

    /// Unlinks everything issued to `local_id`. See [`LinkWriter::remove_local`].
    pub async fn remove_local(&self, local_id: &str) -> IdentResult<()> {
        self.write().await.remove_local(local_id).await
    }

    /// Records `name_id` as the identifier last published to `relying_party_id`.
    ///
    /// Overwrites any earlier record.
    pub async fn publish(
        &self,
        local_id: &str,
        relying_party_id: &str,
        name_id: &NameId,
    ) -> IdentResult<()> {
        let key = published_key(local_id, relying_party_id);
        let value = serde_json::to_string(name_id).map_err(|e| IdentError::CorruptRecord {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.set(&key, &value).await?;
        tracing::info!(local_id, relying_party_id, "published NameID");
        Ok(())
    }

    /// Returns the identifier last published to `relying_party_id`.
    pub async fn published(
        &self,
        local_id: &str,
        relying_party_id: &str,
    ) -> IdentResult<Option<NameId>> {
        let key = published_key(local_id, relying_party_id);
        match self.store.get(&key).await? {
            Some(value) => serde_json::from_str(&value)
                .map(Some)
                .map_err(|e| IdentError::CorruptRecord {
                    key,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }
}

async fn forward_tokens<S>(store: &S, local_id: &str) -> IdentResult<Vec<String>>
where
    S: KeyValueStore + ?Sized,
{
    Ok(store
        .get(local_id)
        .await?
        .map(|value| split_tokens(&value))
        .unwrap_or_default())
}

/// Exclusive write access to a [`LinkStore`].
pub struct LinkWriter<'a, S: ?Sized> {
    _guard: MutexGuard<'a, ()>,
    store: &'a S,
}

impl<S> LinkWriter<'_, S>
where
    S: KeyValueStore + ?Sized,
{
    /// Returns the backing store.
    #[must_use]
    pub const fn backend(&self) -> &S {
        self.store
    }

    /// Looks up the owner of `token` in the reverse index.
    pub async fn owner_of(&self, token: &str) -> IdentResult<Option<String>> {
        Ok(self.store.get(token).await?)
    }

    /// Returns the raw forward value of `local_id`.
    pub async fn forward_value(&self, local_id: &str) -> IdentResult<Option<String>> {
        Ok(self.store.get(local_id).await?)
    }

    /// Writes back a forward value captured with [`Self::forward_value`] and
    /// points `token` at `local_id`.
    pub async fn restore(
        &mut self,
        local_id: &str,
        forward: Option<&str>,
        token: &str,
    ) -> IdentResult<()> {
        match forward {
            Some(value) => self.store.set(local_id, value).await?,
            None => self.store.delete(local_id).await?,
        }
        self.store.set(token, local_id).await?;
        tracing::debug!(local_id, %token, "restored forward list");
        Ok(())
    }

    /// Appends `name_id`'s token to `local_id`'s forward list and points the
    /// reverse index at `local_id`.
    ///
    /// A token holds qualifiers only, so principals issued NameIDs with the
    /// same qualifiers share one token. The reverse entry follows the last
    /// writer; earlier owners keep the token in their forward lists.
    /// Storing a token the owner already holds leaves the forward list as is.
    ///
    /// ## Errors
    ///
    /// - `IdentError::InvalidNameId` if the NameID has no qualifying attribute
    pub async fn store(&mut self, local_id: &str, name_id: &NameId) -> IdentResult<()> {
        let token = token::encode(name_id);
        if token.is_empty() {
            return Err(IdentError::InvalidNameId(
                "NameID carries no qualifying attribute".to_string(),
            ));
        }

        let previous = if self.store.insert_if_absent(&token, local_id).await? {
            None
        } else {
            let previous = self.store.get(&token).await?;
            if previous.as_deref() != Some(local_id) {
                if let Some(owner) = &previous {
                    tracing::debug!(%token, from = %owner, to = local_id, "reverse entry changes owner");
                }
                self.store.set(&token, local_id).await?;
            }
            previous
        };

        let mut tokens = forward_tokens(self.store, local_id).await?;
        if tokens.contains(&token) {
            tracing::debug!(local_id, %token, "token already linked");
            return Ok(());
        }
        tokens.push(token.clone());

        if let Err(e) = self.store.set(local_id, &join_tokens(&tokens)).await {
            // The reverse entry must never outlive a failed forward write.
            let rollback = match previous.as_deref() {
                Some(owner) if owner == local_id => Ok(()),
                Some(owner) => self.store.set(&token, owner).await,
                None => self.store.delete(&token).await,
            };
            if let Err(rollback) = rollback {
                tracing::warn!(%token, error = %rollback, "failed to roll back reverse entry");
            }
            return Err(e.into());
        }

        tracing::info!(local_id, %token, "linked NameID");
        Ok(())
    }

    /// Removes `name_id` from its owner's forward list and deletes its reverse entry.
    ///
    /// Returns the former owner, or `None` if the token was not linked.
    pub async fn remove_remote(&mut self, name_id: &NameId) -> IdentResult<Option<String>> {
        let token = token::encode(name_id);
        let Some(owner) = self.store.get(&token).await? else {
            tracing::warn!(%token, "remove_remote: token not linked, nothing to do");
            return Ok(None);
        };

        let mut tokens = forward_tokens(self.store, &owner).await?;
        if let Some(pos) = tokens.iter().position(|t| *t == token) {
            tokens.remove(pos);
            if tokens.is_empty() {
                self.store.delete(&owner).await?;
            } else {
                self.store.set(&owner, &join_tokens(&tokens)).await?;
            }
        }

        self.store.delete(&token).await?;
        tracing::info!(local_id = %owner, %token, "unlinked NameID");
        Ok(Some(owner))
    }

    /// Deletes `local_id`'s forward list and every reverse entry pointing at it.
    pub async fn remove_local(&mut self, local_id: &str) -> IdentResult<()> {
        let Some(value) = self.store.get(local_id).await? else {
            tracing::warn!(local_id, "remove_local: unknown local id, nothing to do");
            return Ok(());
        };

        let tokens = split_tokens(&value);
        for token in &tokens {
            if self.store.get(token).await?.as_deref() == Some(local_id) {
                self.store.delete(token).await?;
            }
        }
        self.store.delete(local_id).await?;

        tracing::info!(local_id, removed = tokens.len(), "removed local id");
        Ok(())
    }
}

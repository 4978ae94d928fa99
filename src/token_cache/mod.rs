//! Chunked, credential-backed token cache.
//!
//! The whole cache is one JSON array of [`TokenCacheEntry`]. Because the
//! backing [`CredentialStore`] limits how long a value may be, the array is
//! written as numbered chunks (`<service>_0`, `<service>_1`, ...) plus an
//! index record (`<service>_index`) holding a [`CacheIndex`].
//!
//! Every public operation is queued on one [`OperationChain`] per cache, so
//! two `add` calls never read the same base array and clobber each other.
//!
//! Reads never fail. A missing index, a missing chunk, unparseable JSON or a
//! store read error all mean "empty cache": tokens can always be rebuilt by
//! signing in again. Writes fail with [`TokenCacheError`].

mod chunking;
mod entry;

use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TokenCacheConfig;
use crate::error::TokenCacheError;
use crate::op_chain::OperationChain;
use crate::traits::{CredentialStore, CredentialsError};

pub use chunking::{join_chunks, split_payload, CacheIndex};
pub use entry::{EntryIdentity, TokenCacheEntry, TokenQuery};

/// Why a read degraded to an empty cache.
#[derive(Debug, Error)]
enum ReadFailure {
    #[error("store read failed: {0}")]
    Store(#[from] CredentialsError),
    #[error("chunk {0} listed in the index is missing")]
    MissingChunk(usize),
    #[error("unparseable payload: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Token cache persisted as size-limited chunks in a credential store.
///
/// # Example
///
/// ```ignore
/// use credcache::{TokenCache, TokenCacheConfig, TokenQuery};
///
/// let cache = TokenCache::new(store, TokenCacheConfig::new("azureAccountProvider"))?;
/// cache.add(vec![entry]).await?;
/// let tokens = cache.find(TokenQuery::new().user_id("alice@contoso.com")).await?;
/// ```
#[derive(Debug)]
pub struct TokenCache<S> {
    inner: Arc<CacheInner<S>>,
    chain: OperationChain,
}

/// State shared with queued operations.
#[derive(Debug)]
struct CacheInner<S> {
    store: S,
    config: TokenCacheConfig,
}

impl<S: CredentialStore + 'static> TokenCache<S> {
    /// Create a cache over `store`.
    ///
    /// Fails if the chunk size is zero, larger than the store's advertised
    /// per-value limit, or if that limit cannot hold the index record.
    pub fn new(store: S, config: TokenCacheConfig) -> Result<Self, TokenCacheError> {
        if config.chunk_size == 0 {
            return Err(TokenCacheError::InvalidConfig(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if let Some(max) = store.max_value_len() {
            if config.chunk_size > max {
                return Err(TokenCacheError::InvalidConfig(format!(
                    "chunk size {} exceeds the store limit of {}",
                    config.chunk_size, max
                )));
            }

            let smallest_index = serde_json::to_string(&CacheIndex {
                total_chunks: 1,
                chunk_size: config.chunk_size,
            })?;
            let needed = smallest_index.chars().count();
            if needed > max {
                return Err(TokenCacheError::InvalidConfig(format!(
                    "store limit of {} cannot hold the {}-character chunk index",
                    max, needed
                )));
            }
        }

        let chain = OperationChain::new(format!("token-cache:{}", config.service_key))
            .with_timeout(config.operation_timeout);
        Ok(Self {
            inner: Arc::new(CacheInner { store, config }),
            chain,
        })
    }

    pub fn config(&self) -> &TokenCacheConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Add entries, replacing any existing entry in the same slot
    /// (authority, client id, user id, resource).
    pub fn add(
        &self,
        entries: Vec<TokenCacheEntry>,
    ) -> impl Future<Output = Result<(), TokenCacheError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move { inner.add_entries(entries).await })
    }

    /// Entries matching every field in `query`.
    pub fn find(
        &self,
        query: TokenQuery,
    ) -> impl Future<Output = Result<Vec<TokenCacheEntry>, TokenCacheError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move { inner.find_entries(query).await })
    }

    /// Remove the entries occupying the same slots as `entries`. Entries
    /// with no stored counterpart are ignored.
    pub fn remove(
        &self,
        entries: Vec<TokenCacheEntry>,
    ) -> impl Future<Output = Result<(), TokenCacheError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move { inner.remove_entries(entries).await })
    }

    /// Remove every entry matching `query` in a single queued operation and
    /// return what was removed.
    pub fn remove_matching(
        &self,
        query: TokenQuery,
    ) -> impl Future<Output = Result<Vec<TokenCacheEntry>, TokenCacheError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move { inner.remove_matching_entries(query).await })
    }

    /// Every stored entry.
    pub fn entries(
        &self,
    ) -> impl Future<Output = Result<Vec<TokenCacheEntry>, TokenCacheError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move { inner.find_entries(TokenQuery::new()).await })
    }

    /// Delete every chunk and the index.
    pub fn clear(&self) -> impl Future<Output = Result<(), TokenCacheError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move { inner.clear_all().await })
    }

}

impl<S: CredentialStore> CacheInner<S> {
    async fn add_entries(&self, entries: Vec<TokenCacheEntry>) -> Result<(), TokenCacheError> {
        let mut cache = self.read_cache().await;
        for entry in entries {
            cache.retain(|existing| !existing.same_slot(&entry));
            cache.push(entry);
        }
        self.write_cache(&cache).await
    }

    async fn find_entries(
        &self,
        query: TokenQuery,
    ) -> Result<Vec<TokenCacheEntry>, TokenCacheError> {
        let cache = self.read_cache().await;
        Ok(cache.into_iter().filter(|e| query.matches(e)).collect())
    }

    async fn remove_entries(&self, entries: Vec<TokenCacheEntry>) -> Result<(), TokenCacheError> {
        let mut cache = self.read_cache().await;
        let before = cache.len();
        for entry in &entries {
            cache.retain(|existing| !existing.same_slot(entry));
        }

        if cache.len() == before {
            debug!(service = %self.config.service_key, "nothing to remove");
            return Ok(());
        }
        self.write_cache(&cache).await
    }

    async fn remove_matching_entries(
        &self,
        query: TokenQuery,
    ) -> Result<Vec<TokenCacheEntry>, TokenCacheError> {
        let cache = self.read_cache().await;
        let (removed, kept): (Vec<_>, Vec<_>) = cache.into_iter().partition(|e| query.matches(e));

        if !removed.is_empty() {
            self.write_cache(&kept).await?;
        }
        Ok(removed)
    }

    async fn clear_all(&self) -> Result<(), TokenCacheError> {
        self.delete_chunks().await?;
        self.store.delete(&self.config.index_key()).await?;
        debug!(service = %self.config.service_key, "token cache cleared");
        Ok(())
    }

    async fn read_index(&self) -> Result<Option<CacheIndex>, ReadFailure> {
        match self.store.read(&self.config.index_key()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn try_read_cache(&self) -> Result<Vec<TokenCacheEntry>, ReadFailure> {
        let index = match self.read_index().await? {
            Some(index) => index,
            None => return Ok(Vec::new()),
        };

        // Chunk boundaries fall anywhere in the JSON, so order matters.
        let mut chunks = Vec::with_capacity(index.total_chunks);
        for i in 0..index.total_chunks {
            let chunk = self
                .store
                .read(&self.config.chunk_key(i))
                .await?
                .ok_or(ReadFailure::MissingChunk(i))?;
            chunks.push(chunk);
        }

        Ok(serde_json::from_str(&join_chunks(&chunks))?)
    }

    async fn read_cache(&self) -> Vec<TokenCacheEntry> {
        match self.try_read_cache().await {
            Ok(entries) => entries,
            Err(reason) => {
                warn!(
                    service = %self.config.service_key,
                    %reason,
                    "token cache unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Delete the chunks described by the current index, if any.
    async fn delete_chunks(&self) -> Result<(), TokenCacheError> {
        let previous = match self.read_index().await {
            Ok(previous) => previous,
            Err(reason) => {
                debug!(service = %self.config.service_key, %reason, "no usable previous index");
                None
            }
        };

        if let Some(previous) = previous {
            let deletes = (0..previous.total_chunks).map(|i| {
                let key = self.config.chunk_key(i);
                async move { self.store.delete(&key).await }
            });
            try_join_all(deletes).await?;
        }
        Ok(())
    }

    async fn write_cache(&self, entries: &[TokenCacheEntry]) -> Result<(), TokenCacheError> {
        let payload = serde_json::to_string(entries)?;
        let chunks = split_payload(&payload, self.config.chunk_size);
        let index = CacheIndex {
            total_chunks: chunks.len(),
            chunk_size: self.config.chunk_size,
        };
        let index_json = serde_json::to_string(&index)?;

        // Refuse before touching the stored set if the index cannot be saved.
        if let Some(max) = self.store.max_value_len() {
            let len = index_json.chars().count();
            if len > max {
                return Err(CredentialsError::ValueTooLarge {
                    key: self.config.index_key(),
                    len,
                    max,
                }
                .into());
            }
        }

        // Clear the old set first so a shrinking cache leaves no orphans.
        self.delete_chunks().await?;

        let writes = chunks.iter().enumerate().map(|(i, chunk)| {
            let key = self.config.chunk_key(i);
            async move { self.store.save(&key, chunk).await }
        });
        try_join_all(writes).await?;

        // The index goes last: it must never describe chunks not yet written.
        self.store
            .save(&self.config.index_key(), &index_json)
            .await?;

        debug!(
            service = %self.config.service_key,
            entries = entries.len(),
            chunks = index.total_chunks,
            "token cache written"
        );
        Ok(())
    }
}

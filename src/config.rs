//! Construction-time configuration.
//!
//! Limits are injected per instance so two providers can keep caches with
//! different chunk sizes side by side.

use std::time::Duration;

/// Default largest chunk payload, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default suffix appended to the service key to name the index record.
pub const DEFAULT_INDEX_SUFFIX: &str = "index";

/// Default number of change events buffered per account store subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Environment override for [`TokenCacheConfig::chunk_size`].
pub const CHUNK_SIZE_ENV: &str = "CREDCACHE_CHUNK_SIZE";

/// Environment override for [`TokenCacheConfig::operation_timeout`], in milliseconds.
pub const OP_TIMEOUT_ENV: &str = "CREDCACHE_OP_TIMEOUT_MS";

/// Configuration for a [`TokenCache`](crate::token_cache::TokenCache).
///
/// # Example
///
/// ```ignore
/// use credcache::TokenCacheConfig;
///
/// let config = TokenCacheConfig::new("azureAccountProvider")
///     .with_chunk_size(1024)
///     .with_operation_timeout(Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TokenCacheConfig {
    /// Base key every chunk and the index are derived from
    pub service_key: String,
    /// Largest chunk payload in characters; must respect the store's limit
    pub chunk_size: usize,
    /// Suffix for the index key (`<service_key>_<index_suffix>`)
    pub index_suffix: String,
    /// Per-operation timeout (default: none, operations may wait forever)
    pub operation_timeout: Option<Duration>,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            service_key: "credcache".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            index_suffix: DEFAULT_INDEX_SUFFIX.to_string(),
            operation_timeout: None,
        }
    }
}

impl TokenCacheConfig {
    /// Create a config for the cache stored under `service_key`.
    pub fn new(service_key: impl Into<String>) -> Self {
        Self {
            service_key: service_key.into(),
            ..Self::default()
        }
    }

    /// Create a config and apply `CREDCACHE_CHUNK_SIZE` / `CREDCACHE_OP_TIMEOUT_MS`
    /// overrides. Unparseable values are ignored with a warning.
    pub fn from_env(service_key: impl Into<String>) -> Self {
        let mut config = Self::new(service_key);

        if let Ok(raw) = std::env::var(CHUNK_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(size) => config.chunk_size = size,
                Err(e) => tracing::warn!(var = CHUNK_SIZE_ENV, value = %raw, error = %e, "ignoring invalid override"),
            }
        }

        if let Ok(raw) = std::env::var(OP_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.operation_timeout = Some(Duration::from_millis(ms)),
                Err(e) => tracing::warn!(var = OP_TIMEOUT_ENV, value = %raw, error = %e, "ignoring invalid override"),
            }
        }

        config
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the index key suffix.
    pub fn with_index_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.index_suffix = suffix.into();
        self
    }

    /// Set the per-operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Key of the index record.
    pub fn index_key(&self) -> String {
        format!("{}_{}", self.service_key, self.index_suffix)
    }

    /// Key of chunk number `index`.
    pub fn chunk_key(&self, index: usize) -> String {
        format!("{}_{}", self.service_key, index)
    }
}

/// Configuration for an [`AccountStore`](crate::account_store::AccountStore).
#[derive(Debug, Clone, PartialEq)]
pub struct AccountStoreConfig {
    /// Name used in logs and timeout errors
    pub name: String,
    /// Change events buffered per subscriber before it starts lagging
    pub event_capacity: usize,
    /// Per-operation timeout (default: none)
    pub operation_timeout: Option<Duration>,
}

impl Default for AccountStoreConfig {
    fn default() -> Self {
        Self {
            name: "accounts".to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            operation_timeout: None,
        }
    }
}

impl AccountStoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

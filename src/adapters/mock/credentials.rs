//! In-memory credential store for testing.
//!
//! Stores values in a shared map so tests can inspect exactly which keys a
//! token cache wrote, inject failures, and slow every call down to provoke
//! interleaving.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{CredentialStore, CredentialsError};

/// In-memory credential store for testing.
///
/// Clones share state.
///
/// # Example
///
/// ```ignore
/// use credcache::adapters::mock::InMemoryCredentialStore;
///
/// let store = InMemoryCredentialStore::new().with_max_value_len(512);
/// let cache = TokenCache::new(store.clone(), TokenCacheConfig::new("svc"))?;
/// cache.add(vec![entry]).await?;
/// assert!(store.get("svc_index").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    /// Stored values by key
    values: Arc<Mutex<HashMap<String, String>>>,
    /// Whether read should fail
    read_should_fail: Arc<Mutex<bool>>,
    /// Whether save should fail
    save_should_fail: Arc<Mutex<bool>>,
    /// Whether delete should fail
    delete_should_fail: Arc<Mutex<bool>>,
    /// Per-value size limit advertised and enforced
    max_value_len: Option<usize>,
    /// Artificial delay before every call
    latency: Option<Duration>,
    saves: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl InMemoryCredentialStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values longer than `max` characters.
    pub fn with_max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = Some(max);
        self
    }

    /// Sleep for `latency` at the start of every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Configure whether read should fail.
    pub fn set_read_should_fail(&self, should_fail: bool) {
        *self.read_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether delete should fail.
    pub fn set_delete_should_fail(&self, should_fail: bool) {
        *self.delete_should_fail.lock().unwrap() = should_fail;
    }

    /// Get a value synchronously (for assertions).
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Set a value synchronously, bypassing limits (for seeding corrupt state).
    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Stored keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of successful deletes so far.
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn read(&self, key: &str) -> Result<Option<String>, CredentialsError> {
        self.simulate_latency().await;
        if *self.read_should_fail.lock().unwrap() {
            return Err(CredentialsError::ReadFailed("Mock read failure".to_string()));
        }

        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialsError> {
        self.simulate_latency().await;
        if *self.save_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("Mock save failure".to_string()));
        }
        if let Some(max) = self.max_value_len {
            let len = value.chars().count();
            if len > max {
                return Err(CredentialsError::ValueTooLarge {
                    key: key.to_string(),
                    len,
                    max,
                });
            }
        }

        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CredentialsError> {
        self.simulate_latency().await;
        if *self.delete_should_fail.lock().unwrap() {
            return Err(CredentialsError::DeleteFailed("Mock delete failure".to_string()));
        }

        let removed = self.values.lock().unwrap().remove(key).is_some();
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(removed)
    }

    fn max_value_len(&self) -> Option<usize> {
        self.max_value_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.read("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_read_delete() {
        let store = InMemoryCredentialStore::new();

        store.save("k", "v").await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.save_count(), 1);

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.read("k").await.unwrap(), None);
        assert_eq!(store.delete_count(), 2);
    }

    #[tokio::test]
    async fn test_max_value_len_enforced() {
        let store = InMemoryCredentialStore::new().with_max_value_len(3);
        assert_eq!(store.max_value_len(), Some(3));

        store.save("ok", "abc").await.unwrap();
        let result = store.save("big", "abcd").await;
        assert!(matches!(
            result,
            Err(CredentialsError::ValueTooLarge { len: 4, max: 3, .. })
        ));
        assert!(store.get("big").is_none());
    }

    #[tokio::test]
    async fn test_failure_toggles() {
        let store = InMemoryCredentialStore::new();
        store.insert("k", "v");

        store.set_read_should_fail(true);
        assert!(matches!(store.read("k").await, Err(CredentialsError::ReadFailed(_))));

        store.set_save_should_fail(true);
        assert!(matches!(store.save("k", "w").await, Err(CredentialsError::SaveFailed(_))));

        store.set_delete_should_fail(true);
        assert!(matches!(store.delete("k").await, Err(CredentialsError::DeleteFailed(_))));

        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryCredentialStore::new();
        let cloned = store.clone();
        store.insert("svc_0", "a");
        store.insert("svc_index", "b");
        store.insert("other", "c");

        assert_eq!(cloned.keys(), vec!["other", "svc_0", "svc_index"]);
        assert_eq!(cloned.keys_with_prefix("svc_"), vec!["svc_0", "svc_index"]);
    }
}

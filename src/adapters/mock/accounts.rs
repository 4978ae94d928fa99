//! In-memory account storage for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::Account;
use crate::traits::{AccountStorage, StorageError};

/// In-memory account blob for testing.
///
/// Clones share state, so a test can keep one handle and mutate the "stored"
/// list behind the store's back to simulate another process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountStorage {
    /// Stored list, `None` until first written
    accounts: Arc<Mutex<Option<Vec<Account>>>>,
    /// Whether load should fail
    load_should_fail: Arc<Mutex<bool>>,
    /// Whether store should fail
    store_should_fail: Arc<Mutex<bool>>,
    /// Delay before every load and store, shared by clones
    latency: Arc<Mutex<Option<Duration>>>,
    stores: Arc<AtomicUsize>,
}

impl InMemoryAccountStorage {
    /// Create empty storage (never written).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds `accounts`.
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let storage = Self::new();
        storage.set_accounts(Some(accounts));
        storage
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether store should fail.
    pub fn set_store_should_fail(&self, should_fail: bool) {
        *self.store_should_fail.lock().unwrap() = should_fail;
    }

    /// Sleep for `latency` at the start of every call; `None` turns it off.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Get the stored list synchronously (for assertions).
    pub fn get_accounts(&self) -> Option<Vec<Account>> {
        self.accounts.lock().unwrap().clone()
    }

    /// Replace the stored list synchronously (simulates an out-of-band write).
    pub fn set_accounts(&self, accounts: Option<Vec<Account>>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    /// Number of successful stores so far.
    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AccountStorage for InMemoryAccountStorage {
    async fn load(&self) -> Result<Option<Vec<Account>>, StorageError> {
        self.simulate_latency().await;
        if *self.load_should_fail.lock().unwrap() {
            return Err(StorageError::LoadFailed("Mock load failure".to_string()));
        }

        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn store(&self, accounts: &[Account]) -> Result<(), StorageError> {
        self.simulate_latency().await;
        if *self.store_should_fail.lock().unwrap() {
            return Err(StorageError::StoreFailed("Mock store failure".to_string()));
        }

        *self.accounts.lock().unwrap() = Some(accounts.to_vec());
        self.stores.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

//! Persisted account blob abstraction.
//!
//! The account store keeps its list in a single slot owned by the host
//! (a settings file, an extension memento). It is read on every forced
//! refresh and rewritten after every mutation.

use async_trait::async_trait;

use crate::models::Account;

/// Account blob operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Failed to load the account list
    LoadFailed(String),
    /// Failed to store the account list
    StoreFailed(String),
    /// The stored blob is not a valid account list
    Corrupt(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::LoadFailed(msg) => write!(f, "Failed to load accounts: {}", msg),
            StorageError::StoreFailed(msg) => write!(f, "Failed to store accounts: {}", msg),
            StorageError::Corrupt(msg) => write!(f, "Stored accounts are corrupt: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Single read/write slot holding the persisted account list.
#[async_trait]
pub trait AccountStorage: Send + Sync {
    /// Load the persisted list.
    ///
    /// # Returns
    /// - `Ok(Some(accounts))` if the slot has been written
    /// - `Ok(None)` if nothing was ever stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<Vec<Account>>, StorageError>;

    /// Replace the persisted list.
    async fn store(&self, accounts: &[Account]) -> Result<(), StorageError>;
}

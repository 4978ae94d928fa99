//! Account provider contract.
//!
//! A provider signs users in, persists the accounts it discovers through
//! the account store and keeps their tokens in a token cache. The sign-in
//! mechanics themselves (device code, browser redirect) live entirely on the
//! provider side.

use async_trait::async_trait;

use crate::error::CredCacheResult;
use crate::models::{Account, AccountKey};

/// Interface a host uses to drive an account provider.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Interactive sign-in. Produces one new or updated account.
    async fn prompt(&self) -> CredCacheResult<Account>;

    /// Wipe every cached token belonging to `key`.
    async fn clear(&self, key: &AccountKey) -> CredCacheResult<()>;

    /// Receive the accounts restored from storage at startup and return
    /// them, marking any whose tokens are gone as stale.
    async fn initialize(&self, restored: Vec<Account>) -> CredCacheResult<Vec<Account>>;
}

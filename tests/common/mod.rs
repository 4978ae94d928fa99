//! Common test utilities for integration tests.
//!
//! Fixtures for token entries and accounts, plus a test account provider
//! that wires a token cache and an account store together.
//!
//! # Example
//!
//! ```ignore
//! use common::{token, test_cache};
//!
//! let cache = test_cache(64);
//! cache.add(vec![token("alice", "arm")]).await?;
//! ```

pub mod mocks;

pub use mocks::*;

use chrono::{DateTime, TimeZone, Utc};
use credcache::adapters::InMemoryCredentialStore;
use credcache::{Account, AccountKey, DisplayInfo, TokenCache, TokenCacheConfig, TokenCacheEntry};
use serde_json::json;

pub const AUTHORITY: &str = "https://login.microsoftonline.com/common";
pub const CLIENT_ID: &str = "aebc6443-996d-45c2-90f0-388ff96faa56";
pub const SERVICE: &str = "azureAccountProvider";
pub const PROVIDER: &str = "azure";

/// Expiry of every fixture token; far enough out to never lapse.
pub fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
}

/// A token for `user` against `resource` that won't expire during the test.
pub fn token(user: &str, resource: &str) -> TokenCacheEntry {
    TokenCacheEntry::new(AUTHORITY, CLIENT_ID, user, resource, far_future())
    .with_field("accessToken", json!(format!("at-{}-{}", user, resource)))
    .with_field("tokenType", json!("Bearer"))
}

/// An already-expired token.
pub fn expired_token(user: &str, resource: &str) -> TokenCacheEntry {
    let mut entry = token(user, resource);
    entry.expires_on = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    entry
}

/// An account for `user` under the test provider.
pub fn account(user: &str) -> Account {
    Account::new(
        AccountKey::new(PROVIDER, user),
        DisplayInfo::new(format!("{}@contoso.com", user)),
    )
}

pub fn key(user: &str) -> AccountKey {
    AccountKey::new(PROVIDER, user)
}

/// A token cache over a fresh in-memory store that holds at most
/// `max_value_len` characters per value, chunking at the same size.
pub fn test_cache(max_value_len: usize) -> TokenCache<InMemoryCredentialStore> {
    let store = InMemoryCredentialStore::new().with_max_value_len(max_value_len);
    TokenCache::new(
        store,
        TokenCacheConfig::new(SERVICE).with_chunk_size(max_value_len),
    )
    .expect("valid test cache config")
}

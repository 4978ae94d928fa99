//! Error handling for the token cache and account store.
//!
//! - **Error Categories**: coarse classification for retry decisions
//! - **Component Errors**: [`TokenCacheError`], [`AccountStoreError`]
//! - **Unified Error Type**: [`CredCacheError`] consolidates both
//! - **Result Type Alias**: [`CredCacheResult<T>`]
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Storage | Credential store / blob I/O | Yes |
//! | Serialization | Encode/decode failures | No |
//! | Timeout | Operation exceeded its timeout or was aborted | Yes |
//! | Configuration | Invalid limits | No |
//! | Provider | Sign-in failed or was cancelled | No |
//!
//! Collaborator errors ([`CredentialsError`](crate::traits::CredentialsError),
//! [`StorageError`](crate::traits::StorageError)) live next to their traits.

mod account_store;
mod category;
mod credcache_error;
mod result;
mod token_cache;

pub use account_store::AccountStoreError;
pub use category::ErrorCategory;
pub use credcache_error::CredCacheError;
pub use result::CredCacheResult;
pub use token_cache::TokenCacheError;

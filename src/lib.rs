//! credcache - chunked token cache and account reconciliation store.
//!
//! Two storage components for credential-backed hosts:
//!
//! - [`TokenCache`] keeps a list of token entries in a key/value
//!   [`CredentialStore`] that caps the size of a single value, splitting the
//!   serialized list across numbered chunk keys plus an index key.
//! - [`AccountStore`] keeps a de-duplicated account list in an
//!   [`AccountStorage`] slot and publishes [`AccountChangeEvent`]s whenever
//!   the list changes, including changes made by another process.
//!
//! Both run their operations one at a time through an [`OperationChain`].

pub mod account_store;
pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod op_chain;
pub mod token_cache;
pub mod traits;

pub use account_store::{
    AccountChangeEvent, AccountModification, AccountStore, PropertiesPatch, SyncOutcome,
};
pub use config::{AccountStoreConfig, TokenCacheConfig};
pub use error::{AccountStoreError, CredCacheError, CredCacheResult, ErrorCategory, TokenCacheError};
pub use models::{Account, AccountKey, ContextualLogo, DisplayInfo};
pub use op_chain::{OperationChain, OperationTimedOut};
pub use token_cache::{TokenCache, TokenCacheEntry, TokenQuery};
pub use traits::{AccountProvider, AccountStorage, CredentialStore, CredentialsError, StorageError};

//! Trait abstractions for the collaborators this crate depends on.
//!
//! # Traits
//!
//! - [`CredentialStore`] - size-limited key/value store backing the token cache
//! - [`AccountStorage`] - persisted blob backing the account store
//! - [`AccountProvider`] - the provider-side contract a host drives

pub mod account_provider;
pub mod account_storage;
pub mod credentials;

pub use account_provider::AccountProvider;
pub use account_storage::{AccountStorage, StorageError};
pub use credentials::{CredentialStore, CredentialsError};

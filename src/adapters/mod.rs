//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`FileCredentialStore`] - one file per credential key
//! - [`FileAccountStorage`] - account list in a single JSON file
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides in-memory test doubles:
//! - [`mock::InMemoryCredentialStore`]
//! - [`mock::InMemoryAccountStorage`]

pub mod file_accounts;
pub mod file_credentials;
pub mod mock;

pub use file_accounts::FileAccountStorage;
pub use file_credentials::FileCredentialStore;
pub use mock::{InMemoryAccountStorage, InMemoryCredentialStore};

//! Mock implementations for testing.
//!
//! In-memory stand-ins for the storage traits, with failure injection and
//! inspection helpers, so caches and stores can be tested without touching
//! the filesystem.
//!
//! # Available Mocks
//!
//! - [`InMemoryCredentialStore`] - size-limited key/value credential store
//! - [`InMemoryAccountStorage`] - single-slot account blob

pub mod accounts;
pub mod credentials;

pub use accounts::InMemoryAccountStorage;
pub use credentials::InMemoryCredentialStore;

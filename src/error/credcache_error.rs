//! Unified error type for the crate.
//!
//! Hosts that drive both components (an account provider, say) can use
//! [`CredCacheError`] and still classify failures uniformly.

use thiserror::Error;

use super::account_store::AccountStoreError;
use super::category::ErrorCategory;
use super::token_cache::TokenCacheError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CredCacheError {
    #[error(transparent)]
    TokenCache(#[from] TokenCacheError),

    #[error(transparent)]
    AccountStore(#[from] AccountStoreError),

    /// Raised by account providers (sign-in failed, account unknown).
    #[error("account provider error: {0}")]
    Provider(String),
}

impl CredCacheError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CredCacheError::TokenCache(err) => err.category(),
            CredCacheError::AccountStore(err) => err.category(),
            CredCacheError::Provider(_) => ErrorCategory::Provider,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            CredCacheError::TokenCache(err) => err.error_code(),
            CredCacheError::AccountStore(err) => err.error_code(),
            CredCacheError::Provider(_) => "PROVIDER",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

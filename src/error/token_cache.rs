//! Token cache error types.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::op_chain::{OperationAborted, OperationTimedOut};
use crate::traits::CredentialsError;

/// Errors surfaced by [`TokenCache`](crate::token_cache::TokenCache).
///
/// Reads never produce these: an unreadable or corrupt cache is treated as
/// empty. Only writes, configuration and timeouts fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenCacheError {
    /// The credential store rejected a save or delete.
    #[error("credential store error: {0}")]
    Store(#[from] CredentialsError),

    /// The entry list could not be encoded.
    #[error("failed to serialize token cache: {0}")]
    Serialization(String),

    /// The cache was constructed with unusable limits.
    #[error("invalid token cache configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Timeout(#[from] OperationTimedOut),

    #[error(transparent)]
    Aborted(#[from] OperationAborted),
}

impl TokenCacheError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TokenCacheError::Store(_) => ErrorCategory::Storage,
            TokenCacheError::Serialization(_) => ErrorCategory::Serialization,
            TokenCacheError::InvalidConfig(_) => ErrorCategory::Configuration,
            TokenCacheError::Timeout(_) | TokenCacheError::Aborted(_) => ErrorCategory::Timeout,
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenCacheError::Store(CredentialsError::ValueTooLarge { .. }) => {
                "TOKEN_CACHE_VALUE_TOO_LARGE"
            }
            TokenCacheError::Store(_) => "TOKEN_CACHE_STORE",
            TokenCacheError::Serialization(_) => "TOKEN_CACHE_SERIALIZE",
            TokenCacheError::InvalidConfig(_) => "TOKEN_CACHE_CONFIG",
            TokenCacheError::Timeout(_) => "TOKEN_CACHE_TIMEOUT",
            TokenCacheError::Aborted(_) => "TOKEN_CACHE_ABORTED",
        }
    }
}

impl From<serde_json::Error> for TokenCacheError {
    fn from(err: serde_json::Error) -> Self {
        TokenCacheError::Serialization(err.to_string())
    }
}

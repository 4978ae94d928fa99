//! Account store error types.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::op_chain::{OperationAborted, OperationTimedOut};
use crate::traits::StorageError;

/// Errors surfaced by [`AccountStore`](crate::account_store::AccountStore).
///
/// Unlike the token cache, storage failures are not masked: an account list
/// cannot safely default to empty.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountStoreError {
    #[error("account storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Timeout(#[from] OperationTimedOut),

    #[error(transparent)]
    Aborted(#[from] OperationAborted),
}

impl AccountStoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AccountStoreError::Storage(StorageError::Corrupt(_)) => ErrorCategory::Serialization,
            AccountStoreError::Storage(_) => ErrorCategory::Storage,
            AccountStoreError::Timeout(_) | AccountStoreError::Aborted(_) => {
                ErrorCategory::Timeout
            }
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccountStoreError::Storage(StorageError::LoadFailed(_)) => "ACCOUNT_STORE_LOAD",
            AccountStoreError::Storage(StorageError::StoreFailed(_)) => "ACCOUNT_STORE_WRITE",
            AccountStoreError::Storage(StorageError::Corrupt(_)) => "ACCOUNT_STORE_CORRUPT",
            AccountStoreError::Timeout(_) => "ACCOUNT_STORE_TIMEOUT",
            AccountStoreError::Aborted(_) => "ACCOUNT_STORE_ABORTED",
        }
    }
}

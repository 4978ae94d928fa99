//! Result type alias for crate operations.

use super::credcache_error::CredCacheError;

/// Type alias for Results using [`CredCacheError`].
pub type CredCacheResult<T> = Result<T, CredCacheError>;

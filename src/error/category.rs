//! Error category classification.
//!
//! Categories give callers a coarse handle on what went wrong without
//! matching on every variant of every component error.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The backing credential store or account blob rejected an I/O call.
    /// Often transient (locked keychain, busy disk).
    Storage,

    /// Persisted data could not be encoded or decoded.
    Serialization,

    /// A queued operation did not settle within its configured timeout.
    Timeout,

    /// Invalid construction parameters (zero chunk size, chunk size larger
    /// than the store allows).
    Configuration,

    /// The account provider failed or the user cancelled sign-in.
    Provider,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Storage | ErrorCategory::Timeout)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Storage => "storage",
            ErrorCategory::Serialization => "serialization",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Provider => "provider",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Storage => "Check that the credential store is unlocked and writable.",
            ErrorCategory::Serialization => {
                "Clear the persisted cache; tokens can be rebuilt by signing in again."
            }
            ErrorCategory::Timeout => "Retry the operation.",
            ErrorCategory::Configuration => "Fix the cache configuration and recreate it.",
            ErrorCategory::Provider => "Sign in to the account again.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

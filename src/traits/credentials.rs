//! Credential store trait abstraction.
//!
//! The token cache persists into a key/value store that limits how large a
//! single value may be (an OS keychain, a secrets service). This trait is the
//! only thing the cache knows about that store.

use async_trait::async_trait;

/// Credential store operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsError {
    /// Failed to read a credential
    ReadFailed(String),
    /// Failed to save a credential
    SaveFailed(String),
    /// Failed to delete a credential
    DeleteFailed(String),
    /// The value exceeds the store's per-value size limit
    ValueTooLarge { key: String, len: usize, max: usize },
    /// IO error
    Io(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::ReadFailed(msg) => write!(f, "Failed to read credential: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credential: {}", msg),
            CredentialsError::DeleteFailed(msg) => {
                write!(f, "Failed to delete credential: {}", msg)
            }
            CredentialsError::ValueTooLarge { key, len, max } => write!(
                f,
                "Credential '{}' is {} characters, store limit is {}",
                key, len, max
            ),
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credential store error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

impl From<std::io::Error> for CredentialsError {
    fn from(err: std::io::Error) -> Self {
        CredentialsError::Io(err.to_string())
    }
}

/// Size-limited key/value credential store.
///
/// Every call may fail. The token cache treats read failures as "nothing
/// stored" and propagates save/delete failures to its caller.
///
/// # Example
///
/// ```ignore
/// use credcache::traits::CredentialStore;
///
/// async fn rotate<S: CredentialStore>(store: &S) -> Result<(), CredentialsError> {
///     if let Some(old) = store.read("service_0").await? {
///         store.save("service_backup", &old).await?;
///     }
///     store.delete("service_0").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if nothing is stored under the key
    /// - `Err(error)` if the store could not be read
    async fn read(&self, key: &str) -> Result<Option<String>, CredentialsError>;

    /// Save `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialsError>;

    /// Delete the value under `key`.
    ///
    /// # Returns
    /// `Ok(true)` if a value was removed, `Ok(false)` if the key was absent.
    async fn delete(&self, key: &str) -> Result<bool, CredentialsError>;

    /// Largest value, in characters, this store accepts. `None` means unbounded.
    fn max_value_len(&self) -> Option<usize> {
        None
    }
}

//! File-backed credential store adapter.
//!
//! One file per key under `~/.credcache/credentials/`. Useful on hosts
//! without a keychain and for exercising the chunked cache against a real
//! filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::traits::{CredentialStore, CredentialsError};

const STORE_DIR: &str = ".credcache";
const CREDENTIALS_DIR: &str = "credentials";

/// File-backed [`CredentialStore`].
///
/// Keys are sanitized into file names: anything other than ASCII
/// alphanumerics, `-`, `_` and `.` becomes `_`. Two keys that sanitize to
/// the same name share a file.
///
/// # Example
///
/// ```ignore
/// use credcache::adapters::FileCredentialStore;
/// use credcache::{TokenCache, TokenCacheConfig};
///
/// let store = FileCredentialStore::new()?.with_max_value_len(2048);
/// let cache = TokenCache::new(store, TokenCacheConfig::new("azure"))?;
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    root: PathBuf,
    max_value_len: Option<usize>,
}

impl FileCredentialStore {
    /// Store rooted at `~/.credcache/credentials`.
    ///
    /// # Returns
    /// The store, or an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CredentialsError> {
        let home = dirs::home_dir().ok_or_else(|| {
            CredentialsError::Other("Failed to determine home directory".to_string())
        })?;
        Ok(Self::at(home.join(STORE_DIR).join(CREDENTIALS_DIR)))
    }

    /// Store rooted at `root`. The directory is created on first save.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_value_len: None,
        }
    }

    /// Reject values longer than `max` characters, like a keychain would.
    pub fn with_max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = Some(max);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(sanitize_key(key))
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn read(&self, key: &str) -> Result<Option<String>, CredentialsError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CredentialsError::ReadFailed(format!("{}: {}", key, err))),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialsError> {
        if let Some(max) = self.max_value_len {
            let len = value.chars().count();
            if len > max {
                return Err(CredentialsError::ValueTooLarge {
                    key: key.to_string(),
                    len,
                    max,
                });
            }
        }

        fs::create_dir_all(&self.root).await?;
        fs::write(self.path_for(key), value)
            .await
            .map_err(|err| CredentialsError::SaveFailed(format!("{}: {}", key, err)))?;
        debug!(key, len = value.len(), "credential saved");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CredentialsError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(CredentialsError::DeleteFailed(format!("{}: {}", key, err))),
        }
    }

    fn max_value_len(&self) -> Option<usize> {
        self.max_value_len
    }
}

//! File-backed account storage adapter.
//!
//! The whole list lives in one pretty-printed JSON file,
//! `~/.credcache/accounts.json` by default.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::models::Account;
use crate::traits::{AccountStorage, StorageError};

const STORE_DIR: &str = ".credcache";
const ACCOUNTS_FILE: &str = "accounts.json";

/// JSON-file [`AccountStorage`].
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct FileAccountStorage {
    path: PathBuf,
}

impl FileAccountStorage {
    /// Storage at `~/.credcache/accounts.json`.
    ///
    /// # Returns
    /// The storage, or an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StorageError> {
        let home = dirs::home_dir().ok_or_else(|| {
            StorageError::LoadFailed("Failed to determine home directory".to_string())
        })?;
        Ok(Self::at(home.join(STORE_DIR).join(ACCOUNTS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl AccountStorage for FileAccountStorage {
    async fn load(&self) -> Result<Option<Vec<Account>>, StorageError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::LoadFailed(err.to_string())),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Corrupt(err.to_string()))
    }

    async fn store(&self, accounts: &[Account]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(accounts)
            .map_err(|err| StorageError::StoreFailed(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::StoreFailed(err.to_string()))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .map_err(|err| StorageError::StoreFailed(err.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|err| StorageError::StoreFailed(err.to_string()))
    }
}

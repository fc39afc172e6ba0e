use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token file name inside the app data directory
const TOKEN_FILE: &str = "token.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not determine a local data directory")]
    NoDataDir,

    #[error("token file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("keychain access failed: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Durable home for the session token. At most one token is held at a time;
/// absence means nobody is logged in.
///
/// Callers treat a `get` failure as "no token", and log-and-continue on
/// `set`/`clear` failures: losing a persisted token only costs a re-login.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, StoreError>;
    fn set(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as a small JSON file, the default backend.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory, e.g.
    /// `~/.local/share/<app>/token.json` on Linux.
    pub fn in_data_dir(app_name: &str) -> Result<Self, StoreError> {
        let dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dir.join(app_name).join(TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&contents)?;
        Ok(Some(stored.token))
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Token kept in the OS keychain under a service/account pair.
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> FileTokenStore {
        let dir = std::env::temp_dir()
            .join("whattodo-core-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let store = FileTokenStore::new(dir.join(TOKEN_FILE));
        let _ = store.clear();
        store
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("tok-1").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-1"));

        store.set("tok-2").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-2"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_no_token() {
        let store = temp_store("missing");
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let store = temp_store("round-trip");

        store.set("secret-token").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("secret-token"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_malformed_file() {
        let store = temp_store("malformed");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.get(), Err(StoreError::Malformed(_))));
        store.clear().unwrap();
    }
}

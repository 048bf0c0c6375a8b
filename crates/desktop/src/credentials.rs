//! Persisted session credential.
//!
//! Two slots, `access_token` and `refresh_token`, stored together. Writes
//! happen only on login; reads only on hydration; deletes on logout or a
//! failed hydration.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::types::TokenPair;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

impl From<TokenPair> for StoredCredentials {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("credential store I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credential file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode credentials: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage for the single session credential.
///
/// Calls are synchronous; the provider makes them while holding its state lock.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredCredentials>, CredentialStoreError>;

    fn save(&self, credentials: &StoredCredentials) -> Result<(), CredentialStoreError>;

    /// Remove the credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn load(&self) -> Result<Option<StoredCredentials>, CredentialStoreError> {
        (**self).load()
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), CredentialStoreError> {
        (**self).save(credentials)
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        (**self).clear()
    }
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<StoredCredentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>, CredentialStoreError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), CredentialStoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// JSON file store. Writes go through a temporary file and a rename.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CredentialStoreError {
        CredentialStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>, CredentialStoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CredentialStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), CredentialStoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_vec_pretty(credentials)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        restrict_permissions(&tmp).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredCredentials {
        StoredCredentials {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
        }
    }

    #[test]
    fn in_memory_store_lifecycle() {
        let store = InMemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_uses_named_slots() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("credentials.json"));

        assert!(store.load().unwrap().is_none());
        store.save(&sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["access_token"], "access");
        assert_eq!(raw["refresh_token"], "refresh");
        assert_eq!(store.load().unwrap(), Some(sample()));

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = FileCredentialStore::new(path).load().unwrap_err();
        assert!(matches!(err, CredentialStoreError::Corrupt { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private_to_the_user() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.save(&sample()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn debug_output_hides_tokens() {
        assert!(!format!("{:?}", sample()).contains("access\""));
    }
}

//! Durable key/value backends for session state.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::SessionError;

/// A small string key/value store that survives process restarts.
///
/// Implementations must be safe to share between tasks; the session store
/// only ever touches a single key.
pub trait TokenStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Session storage in a JSON object on disk.
///
/// A missing file reads as empty. Parent directories are created on the
/// first write. A malformed file is reported by `get` and replaced by the
/// next `set` or `remove`.
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(SessionError::io(&self.path, e)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Entries to modify, and whether the file must be rewritten even if
    /// nothing changes because it was malformed.
    fn read_for_update(&self) -> Result<(BTreeMap<String, String>, bool), SessionError> {
        match self.read_all() {
            Ok(entries) => Ok((entries, false)),
            Err(SessionError::Corrupt { reason, .. }) => {
                warn!(path = %self.path.display(), %reason, "Replacing malformed session file");
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        std::fs::write(&self.path, json).map_err(|e| SessionError::io(&self.path, e))
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, _) = self.read_for_update()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, malformed) = self.read_for_update()?;
        if entries.remove(key).is_none() && !malformed {
            return Ok(());
        }
        self.write_all(&entries)
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

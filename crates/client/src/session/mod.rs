//! Session state: the opaque bearer token the API handed out at login.
//!
//! The token is cached in memory and mirrored to a [`TokenStorage`] backend so
//! it survives restarts. [`SessionStore`] is shared by reference with the
//! [`ApiClient`](crate::ApiClient), which reads it before every request, so a
//! login or logout takes effect on the very next call.
//!
//! No freshness or signature checks happen here; the API rejects stale
//! tokens on its own.

mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

/// Storage key the token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Errors raised by session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("Malformed session file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The blocking storage task panicked or was cancelled.
    #[error("Session storage task failed: {0}")]
    Task(String),
}

impl SessionError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Holder of the current session token.
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let authed = self.token.try_read().map(|token| token.is_some()).ok();
        f.debug_struct("SessionStore")
            .field("token", &"[REDACTED]")
            .field("authed", &authed)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open a session backed by `storage`, loading any persisted token.
    ///
    /// Malformed storage opens as an anonymous session; the next login or
    /// logout overwrites it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the stored token cannot be read.
    pub fn open(storage: impl TokenStorage + 'static) -> Result<Self, SessionError> {
        let stored = match storage.get(TOKEN_KEY) {
            Ok(stored) => stored,
            Err(SessionError::Corrupt { path, reason }) => {
                warn!(path = %path.display(), %reason, "Ignoring malformed session file");
                None
            }
            Err(e) => return Err(e),
        };
        let token = stored
            .filter(|token| !token.is_empty())
            .map(SecretString::from);

        debug!(authed = token.is_some(), "Session opened");

        Ok(Self {
            storage: Arc::new(storage),
            token: RwLock::new(token),
        })
    }

    /// Open a session persisted in the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file exists but cannot be read or parsed.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        Self::open(FileTokenStorage::new(path))
    }

    /// A session that lives only as long as this process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryTokenStorage::new()),
            token: RwLock::new(None),
        }
    }

    /// The current token, if logged in.
    pub async fn token(&self) -> Option<SecretString> {
        self.token.read().await.clone()
    }

    /// Whether a token is present.
    pub async fn is_authed(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Persist `token` and make it the current session.
    ///
    /// An empty token is the same as no token and clears the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the token cannot be persisted; the in-memory
    /// session is left unchanged in that case.
    #[instrument(skip_all)]
    pub async fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        if token.expose_secret().is_empty() {
            debug!("Empty session token, clearing session");
            return self.clear_token().await;
        }

        let mut current = self.token.write().await;
        let stored = token.clone();
        self.with_storage(move |storage| storage.set(TOKEN_KEY, stored.expose_secret()))
            .await?;
        *current = Some(token);
        debug!("Session token stored");
        Ok(())
    }

    /// Forget the current token, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage cannot be updated; the in-memory
    /// session is cleared regardless.
    #[instrument(skip_all)]
    pub async fn clear_token(&self) -> Result<(), SessionError> {
        let mut current = self.token.write().await;
        *current = None;
        self.with_storage(|storage| storage.remove(TOKEN_KEY)).await?;
        debug!("Session token cleared");
        Ok(())
    }

    /// Run a storage call on the blocking pool.
    async fn with_storage<F>(&self, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&dyn TokenStorage) -> Result<(), SessionError> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || f(storage.as_ref()))
            .await
            .map_err(|e| SessionError::Task(e.to_string()))?
    }
}

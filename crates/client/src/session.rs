//! Persisted session state (bearer token).
//!
//! The token survives restarts in a small JSON file, the CLI analogue of the
//! browser's persisted auth storage. A corrupt or missing file is treated as
//! "not logged in", never as an error; the rest of this crate shares that
//! degrade-don't-throw posture.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// On-disk session shape.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    issued_at: DateTime<Utc>,
}

/// Shared handle to the current session.
///
/// Cheaply cloneable; all services observe the same token, so a 401-triggered
/// clear is immediately visible everywhere.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    path: PathBuf,
    token: RwLock<Option<SecretString>>,
}

impl SessionStore {
    /// Load the session from disk. Missing or corrupt files mean logged out.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let token = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<PersistedSession>(&raw).ok())
            .map(|persisted| SecretString::from(persisted.token));

        if token.is_some() {
            tracing::debug!(path = %path.display(), "restored persisted session");
        }

        Self {
            inner: Arc::new(SessionInner {
                path,
                token: RwLock::new(token),
            }),
        }
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .map(|token| token.is_some())
            .unwrap_or(false)
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .ok()
            .and_then(|token| token.clone())
    }

    /// Store a fresh token in memory and on disk.
    ///
    /// A failed disk write is logged and otherwise ignored: the session is
    /// still valid for this process, it just will not survive a restart.
    pub fn establish(&self, token: SecretString) {
        let persisted = PersistedSession {
            token: token.expose_secret().to_string(),
            issued_at: Utc::now(),
        };
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = Some(token);
        }

        if let Some(parent) = self.inner.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string(&persisted)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.inner.path, json))
        {
            Ok(()) => tracing::debug!(path = %self.inner.path.display(), "session persisted"),
            Err(e) => tracing::warn!("failed to persist session: {e}"),
        }
    }

    /// Drop the token from memory and disk.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = None;
        }
        if let Err(e) = std::fs::remove_file(&self.inner.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("failed to remove session file: {e}");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.inner.path)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_session_path(name: &str) -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        // Keep the tempdir alive by leaking; tests are short-lived.
        let path = dir.path().join(name);
        std::mem::forget(dir);
        path
    }

    #[test]
    fn test_missing_file_means_logged_out() {
        let store = SessionStore::load(temp_session_path("none.json"));
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_establish_persists_and_reloads() {
        let path = temp_session_path("session.json");
        let store = SessionStore::load(path.clone());
        store.establish(SecretString::from("tok-123"));
        assert!(store.is_authenticated());

        let reloaded = SessionStore::load(path);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token().unwrap().expose_secret(), "tok-123");
    }

    #[test]
    fn test_clear_removes_file() {
        let path = temp_session_path("session.json");
        let store = SessionStore::load(path.clone());
        store.establish(SecretString::from("tok-123"));
        store.clear();
        assert!(!store.is_authenticated());
        assert!(!path.exists());
        // Clearing twice is fine.
        store.clear();
    }

    #[test]
    fn test_corrupt_file_means_logged_out() {
        let path = temp_session_path("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::load(path);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::load(temp_session_path("s.json"));
        store.establish(SecretString::from("super-secret"));
        let debug_output = format!("{store:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret"));
    }
}

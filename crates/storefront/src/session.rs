//! Typed session store.
//!
//! Holds the signed-in user and bearer token. All reads and writes go through
//! [`SessionStore`]; persistence is pluggable via [`SessionBackend`] so the
//! CLI can keep a JSON file while tests stay in memory.
//!
//! The persisted document has exactly two keys, `user` and `token`. Their
//! presence is what gates protected screens; the server is only consulted on
//! start-up (`/me`) and on every request via the bearer token.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use shopfront_core::User;

/// Errors reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("session backend lock poisoned")]
    Poisoned,
    #[error("session write task failed: {0}")]
    Task(String),
}

/// On-disk representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Where the session lives between runs.
pub trait SessionBackend: Send + Sync {
    /// Load the stored session, `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<PersistedSession>, SessionError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, session: &PersistedSession) -> Result<(), SessionError>;

    /// Remove the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file backend.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionBackend for FileBackend {
    fn load(&self) -> Result<Option<PersistedSession>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory backend for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<Option<PersistedSession>>,
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> Result<Option<PersistedSession>, SessionError> {
        Ok(self.stored.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), SessionError> {
        *self.stored.lock().map_err(|_| SessionError::Poisoned)? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.stored.lock().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}

#[derive(Default)]
struct SessionState {
    user: Option<User>,
    token: Option<SecretString>,
    /// Bumped on every change; orders writes to the backend.
    generation: u64,
}

impl SessionState {
    fn snapshot(&mut self) -> Snapshot {
        self.generation += 1;
        let session = (self.user.is_some() || self.token.is_some()).then(|| PersistedSession {
            user: self.user.clone(),
            token: self.token.as_ref().map(|t| t.expose_secret().to_string()),
        });
        Snapshot {
            generation: self.generation,
            session,
        }
    }
}

/// State to hand to the backend; `None` removes the stored session.
struct Snapshot {
    generation: u64,
    session: Option<PersistedSession>,
}

/// The application's session store.
///
/// Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    state: RwLock<SessionState>,
    backend: Arc<dyn SessionBackend>,
    /// Generation of the last snapshot the backend accepted.
    written: tokio::sync::Mutex<u64>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open a store, loading whatever the backend holds.
    ///
    /// An unreadable or corrupt store is treated as signed-out.
    pub fn open(backend: impl SessionBackend + 'static) -> Self {
        let state = match backend.load() {
            Ok(Some(persisted)) => SessionState {
                user: persisted.user,
                token: persisted.token.map(SecretString::from),
                generation: 0,
            },
            Ok(None) => SessionState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session; starting signed out");
                SessionState::default()
            }
        };

        Self {
            inner: Arc::new(SessionStoreInner {
                state: RwLock::new(state),
                backend: Arc::new(backend),
                written: tokio::sync::Mutex::new(0),
            }),
        }
    }

    /// Open a store backed by a JSON file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::open(FileBackend::new(path))
    }

    /// A store that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::default())
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.inner.state.read().await.user.clone()
    }

    /// The bearer token, if any.
    pub async fn token(&self) -> Option<SecretString> {
        self.inner.state.read().await.token.clone()
    }

    /// Both a user and a token are stored.
    pub async fn is_authenticated(&self) -> bool {
        let state = self.inner.state.read().await;
        state.user.is_some() && state.token.is_some()
    }

    /// Store a fresh login.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the session. The
    /// in-memory state is updated regardless.
    pub async fn sign_in(&self, user: User, token: SecretString) -> Result<(), SessionError> {
        let snapshot = {
            let mut state = self.inner.state.write().await;
            state.user = Some(user);
            state.token = Some(token);
            state.snapshot()
        };
        self.persist(snapshot).await
    }

    /// Replace the stored user (after a profile edit or `/me` refresh).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the session.
    pub async fn update_user(&self, user: User) -> Result<(), SessionError> {
        let snapshot = {
            let mut state = self.inner.state.write().await;
            state.user = Some(user);
            state.snapshot()
        };
        self.persist(snapshot).await
    }

    /// Forget the user and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the stored session.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let snapshot = {
            let mut state = self.inner.state.write().await;
            state.user = None;
            state.token = None;
            state.snapshot()
        };
        self.persist(snapshot).await
    }

    /// Forget the session only if its token is still `expected`.
    ///
    /// Returns `false` and leaves the store alone when a newer login has
    /// replaced the token (or the session was already cleared).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the stored session. The
    /// in-memory state is cleared regardless.
    pub async fn clear_if_token(
        &self,
        expected: Option<&SecretString>,
    ) -> Result<bool, SessionError> {
        let snapshot = {
            let mut state = self.inner.state.write().await;
            let current = state.token.as_ref().map(|t| t.expose_secret());
            if current != expected.map(|t| t.expose_secret()) {
                return Ok(false);
            }
            state.user = None;
            state.token = None;
            state.snapshot()
        };
        self.persist(snapshot).await?;
        Ok(true)
    }

    /// Write a snapshot off the async runtime, skipping it if a newer one
    /// already reached the backend.
    async fn persist(&self, snapshot: Snapshot) -> Result<(), SessionError> {
        let mut written = self.inner.written.lock().await;
        if *written >= snapshot.generation {
            return Ok(());
        }

        let backend = Arc::clone(&self.inner.backend);
        let generation = snapshot.generation;
        tokio::task::spawn_blocking(move || match &snapshot.session {
            Some(session) => backend.save(session),
            None => backend.clear(),
        })
        .await
        .map_err(|e| SessionError::Task(e.to_string()))??;

        *written = generation;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Role, UserId};

    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "Ada".to_string(),
            email: "ada@shop.test".to_string(),
            role: Role::User,
            phone: None,
            address: None,
            city: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("shopfront-session-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[tokio::test]
    async fn test_sign_in_and_clear() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated().await);

        store
            .sign_in(user(), SecretString::from("tok-123"))
            .await
            .unwrap();
        assert!(store.is_authenticated().await);
        assert_eq!(
            store.token().await.unwrap().expose_secret(),
            "tok-123"
        );

        store.clear().await.unwrap();
        assert!(store.current_user().await.is_none());
        assert!(store.token().await.is_none());
    }

    #[tokio::test]
    async fn test_file_backend_round_trip_has_two_keys() {
        let path = temp_path("roundtrip");
        let store = SessionStore::from_file(&path);
        store
            .sign_in(user(), SecretString::from("tok-abc"))
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["token".to_string(), "user".to_string()]);

        let reopened = SessionStore::from_file(&path);
        assert_eq!(reopened.current_user().await, Some(user()));

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert!(!SessionStore::from_file(&path).is_authenticated().await);
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_signed_out() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::from_file(&path);
        assert!(!store.is_authenticated().await);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_clear_if_token_ignores_replaced_token() {
        let store = SessionStore::in_memory();
        let old = SecretString::from("tok-old");
        store.sign_in(user(), old.clone()).await.unwrap();
        store
            .sign_in(user(), SecretString::from("tok-new"))
            .await
            .unwrap();

        assert!(!store.clear_if_token(Some(&old)).await.unwrap());
        assert!(store.is_authenticated().await);
        assert_eq!(store.token().await.unwrap().expose_secret(), "tok-new");

        let current = store.token().await;
        assert!(store.clear_if_token(current.as_ref()).await.unwrap());
        assert!(!store.is_authenticated().await);

        // Already signed out: a request sent without a token still matches
        assert!(store.clear_if_token(None).await.unwrap());
        assert!(!store.clear_if_token(Some(&old)).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_reflects_last_of_concurrent_writes() {
        let path = temp_path("concurrent");
        let store = SessionStore::from_file(&path);

        let mut renamed = user();
        renamed.name = "Ada L.".to_string();
        let (signed_in, updated) = tokio::join!(
            store.sign_in(user(), SecretString::from("tok-1")),
            store.update_user(renamed.clone()),
        );
        signed_in.unwrap();
        updated.unwrap();

        let in_memory = store.current_user().await;
        let reopened = SessionStore::from_file(&path);
        assert_eq!(reopened.current_user().await, in_memory);
        assert!(reopened.is_authenticated().await);

        store.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_user_without_token_is_not_authenticated() {
        let backend = MemoryBackend::default();
        backend
            .save(&PersistedSession {
                user: Some(user()),
                token: None,
            })
            .unwrap();
        let store = SessionStore::open(backend);
        assert!(store.current_user().await.is_some());
        assert!(!store.is_authenticated().await);
    }
}

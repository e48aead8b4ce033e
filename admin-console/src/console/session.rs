//! Persisted login state for the console.
//!
//! A session is the bearer token plus the email it was issued for. It lives
//! under two fixed keys in a small key/value document until logout.

use secrecy::{ExposeSecret, Secret};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TOKEN_KEY: &str = "rag_admin_token";
pub const EMAIL_KEY: &str = "rag_admin_email";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Session {
    token: Secret<String>,
    email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            email,
        }
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// `Authorization` header value for authenticated calls.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    fn to_entries(&self) -> BTreeMap<String, String> {
        let mut entries = BTreeMap::new();
        entries.insert(TOKEN_KEY.to_string(), self.token.expose_secret().clone());
        if let Some(email) = &self.email {
            entries.insert(EMAIL_KEY.to_string(), email.clone());
        }
        entries
    }

    /// A session exists only when a token is stored.
    fn from_entries(entries: &BTreeMap<String, String>) -> Option<Self> {
        let token = entries.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        Some(Session::new(token.clone(), entries.get(EMAIL_KEY).cloned()))
    }
}

pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&mut self, session: &Session) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Process-local store, used by tests and one-shot invocations.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: BTreeMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        Self {
            entries: session.to_entries(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(Session::from_entries(&self.entries))
    }

    fn save(&mut self, session: &Session) -> Result<(), SessionError> {
        self.entries = session.to_entries();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.entries.remove(TOKEN_KEY);
        self.entries.remove(EMAIL_KEY);
        Ok(())
    }
}

/// JSON file holding the two session keys. A missing file means logged out.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(Session::from_entries(&self.read_entries()?))
    }

    fn save(&mut self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&session.to_entries())?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

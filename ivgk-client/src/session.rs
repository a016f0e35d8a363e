//! Session persistence
//!
//! A session is three entries: access token, refresh token and the signed-in
//! user. [`ApiClient`](crate::ApiClient) reads the tokens before every
//! request and writes them back after a refresh.

use crate::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{AuthTokens, AuthUser};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<AuthUser>,
}

impl Session {
    pub fn new(tokens: AuthTokens, user: Option<AuthUser>) -> Self {
        Self {
            access_token: Some(tokens.access_token),
            refresh_token: Some(tokens.refresh_token),
            user,
        }
    }

    /// Both an access token and a user record are present
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty()) && self.user.is_some()
    }
}

/// Where the session lives between runs
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Session;

    fn save(&self, session: &Session) -> ClientResult<()>;

    /// Remove all three entries; never fails
    fn clear(&self);

    /// Replace only the access token, keeping the refresh token and user
    fn update_access_token(&self, access_token: &str) -> ClientResult<()> {
        let mut session = self.load();
        session.access_token = Some(access_token.to_string());
        self.save(&session)
    }
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = session.clone();
        Ok(())
    }

    fn clear(&self) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = Session::default();
    }
}

/// On-disk layout; the user is kept raw so a bad record can be dropped alone
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Value>,
}

/// JSON file store
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Option<SessionFile> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable session file, ignoring it");
                None
            }
        }
    }

    fn write_file(&self, file: &SessionFile) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ClientError::Session(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json).map_err(|e| ClientError::Session(e.to_string()))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let Some(mut file) = self.read_file() else {
            return Session::default();
        };

        let user = match file.user.take() {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<AuthUser>(raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse stored user, clearing session user");
                    if let Err(e) = self.write_file(&file) {
                        tracing::warn!(error = %e, "Failed to rewrite session file");
                    }
                    None
                }
            },
        };

        Session {
            access_token: file.access_token,
            refresh_token: file.refresh_token,
            user,
        }
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let user = session.user.as_ref().map(serde_json::to_value).transpose()?;
        self.write_file(&SessionFile {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            user,
        })
    }

    fn clear(&self) {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove session file");
            }
        }
    }
}

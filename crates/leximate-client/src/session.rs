//! Persisted auth session: bearer token plus the cached user object.
//!
//! The session lives in `<data_dir>/session.json`. It is written on OAuth
//! completion and removed on logout; nothing else touches it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::SessionError;

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<Value>,
}

impl AuthSession {
    /// Display name from the cached user: first + last name, falling back to email.
    pub fn display_name(&self) -> Option<String> {
        fn field<'a>(user: &'a Value, key: &str) -> &'a str {
            user.get(key).and_then(Value::as_str).unwrap_or("").trim()
        }

        let user = self.user.as_ref()?;
        let full = format!("{} {}", field(user, "firstName"), field(user, "lastName"));
        let full = full.trim();
        if !full.is_empty() {
            return Some(full.to_string());
        }
        let email = field(user, "email");
        (!email.is_empty()).then(|| email.to_string())
    }
}

/// File-backed store for the single [`AuthSession`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when no session has been persisted.
    pub fn load(&self) -> Result<Option<AuthSession>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the session atomically (temp file in the same directory, then rename).
    pub fn save(&self, session: &AuthSession) -> Result<(), SessionError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, session)?;
        tmp.flush()?;
        tmp.persist(&self.path)?;
        info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the persisted session. Missing files are fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no session to clear");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

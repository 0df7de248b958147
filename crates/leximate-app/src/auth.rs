//! Login state: the bearer token and cached user, persisted between runs.

use std::sync::Arc;

use leximate_client::{ApiError, AuthBackend, AuthSession, SessionError, SessionStore};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token does not belong to any user")]
    NoUser,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Owns the current [`AuthSession`]. Created empty or restored from disk.
pub struct AuthContext<B> {
    backend: Arc<B>,
    store: SessionStore,
    session: Option<AuthSession>,
}

impl<B: AuthBackend> AuthContext<B> {
    pub fn new(backend: Arc<B>, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            session: None,
        }
    }

    /// Load a previously persisted session, if there is one.
    pub fn restore(backend: Arc<B>, store: SessionStore) -> Result<Self, SessionError> {
        let session = store.load()?;
        Ok(Self {
            backend,
            store,
            session,
        })
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Finish the OAuth redirect: resolve the user for `token` and persist both.
    pub async fn complete_oauth(&mut self, token: &str) -> Result<&AuthSession, AuthError> {
        let user = match self.backend.me(token).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.teardown()?;
                return Err(AuthError::NoUser);
            }
            Err(e) => {
                self.teardown()?;
                return Err(e.into());
            }
        };
        let session = AuthSession {
            token: token.to_string(),
            user: Some(user),
        };
        self.store.save(&session)?;
        info!(user = session.display_name().as_deref().unwrap_or("-"), "signed in");
        Ok(self.session.insert(session))
    }

    /// Sign out. The local session is removed even if the backend call fails.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.backend.logout().await {
            warn!(error = %e, "backend logout failed");
        }
        self.teardown()
    }

    fn teardown(&mut self) -> Result<(), SessionError> {
        self.session = None;
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeBackend;
    use serde_json::json;

    #[tokio::test]
    async fn complete_oauth_persists_token_and_user() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = FakeBackend::with(|s| s.me = Some(json!({"email": "ada@example.com"})));
        let mut auth = AuthContext::new(backend.clone(), SessionStore::new(tmp.path()));
        let session = auth.complete_oauth("tok-1").await.unwrap();
        assert_eq!(session.display_name().as_deref(), Some("ada@example.com"));
        assert_eq!(backend.state().me_tokens, vec!["tok-1"]);

        let restored = AuthContext::restore(backend, SessionStore::new(tmp.path())).unwrap();
        assert_eq!(restored.token(), Some("tok-1"));
    }

    #[tokio::test]
    async fn missing_user_tears_down() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());
        store
            .save(&AuthSession {
                token: "stale".into(),
                user: None,
            })
            .unwrap();
        let backend = FakeBackend::new();
        let mut auth = AuthContext::restore(backend, store.clone()).unwrap();
        assert!(auth.token().is_some());
        assert!(matches!(auth.complete_oauth("bad").await, Err(AuthError::NoUser)));
        assert!(auth.session().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn logout_clears_even_when_backend_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = FakeBackend::with(|s| {
            s.me = Some(json!({"firstName": "Ada"}));
            s.failing.insert("logout");
        });
        let store = SessionStore::new(tmp.path());
        let mut auth = AuthContext::new(backend.clone(), store.clone());
        auth.complete_oauth("tok").await.unwrap();
        assert!(store.path().exists());

        auth.logout().await.unwrap();
        assert!(auth.session().is_none());
        assert!(!store.path().exists());
        assert_eq!(backend.state().logouts, 1);
    }
}

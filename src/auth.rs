//! Authentication context.
//!
//! Created once at startup and handed to whatever needs the signed-in user
//! or a bearer token. Clones share the same state, so a token refresh or a
//! sign-out is seen everywhere.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    access_token: Option<String>,
}

impl AuthSession {
    pub fn new(user_id: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl AuthContext {
    /// A context with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(session: AuthSession) -> Self {
        info!(user = %session.user_id, "Signed in");
        Self {
            session: Arc::new(RwLock::new(Some(session))),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.user_id.clone())
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .and_then(|s| s.access_token().map(str::to_owned))
    }

    /// Swap in a rotated access token. Returns false when signed out.
    pub fn refresh(&self, access_token: impl Into<String>) -> bool {
        match self.write().as_mut() {
            Some(session) => {
                session.access_token = Some(access_token.into());
                info!(user = %session.user_id, "Access token refreshed");
                true
            }
            None => false,
        }
    }

    pub fn sign_out(&self) {
        if let Some(session) = self.write().take() {
            info!(user = %session.user_id, "Signed out");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<AuthSession>> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AuthSession>> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}

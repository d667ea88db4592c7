//! Authentication state for a client
//!
//! [`AuthProvider`] owns the active [`Session`] and the persisted bearer
//! token. Every account operation goes through the configured
//! [`AccountStore`](super::AccountStore).

use tokio::sync::RwLock;

use super::storage::DynStorage;
use super::{ClientError, DynAccountStore};
use crate::models::{AuthResponse, User, UserProfileUpdate};

/// Storage key for the persisted bearer token
pub const TOKEN_KEY: &str = "cloudapex_token";

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            user: auth.user,
        }
    }
}

pub struct AuthProvider {
    store: DynAccountStore,
    storage: DynStorage,
    session: RwLock<Option<Session>>,
}

impl AuthProvider {
    pub fn new(store: DynAccountStore, storage: DynStorage) -> Self {
        Self {
            store,
            storage,
            session: RwLock::new(None),
        }
    }

    /// Re-validate a persisted token.
    ///
    /// Returns the restored session, or `None` if there was no token or it
    /// was rejected. A rejected token is removed from storage.
    pub async fn restore(&self) -> Result<Option<Session>, ClientError> {
        let Some(token) = self.stored_token()? else {
            return Ok(None);
        };

        match self.store.current_user(&token).await {
            Ok(user) => {
                let session = Session { token, user };
                *self.session.write().await = Some(session.clone());
                Ok(Some(session))
            }
            Err(err) => {
                tracing::debug!(error = %err, "Discarding persisted token");
                self.storage.remove(TOKEN_KEY)?;
                *self.session.write().await = None;
                Ok(None)
            }
        }
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Session, ClientError> {
        let auth = self.store.signup(name, email, password).await?;
        self.begin(auth).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let auth = self.store.login(email, password).await?;
        self.begin(auth).await
    }

    /// End the session. Local state is always cleared.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let previous = self.session.write().await.take();
        let token = match previous {
            Some(session) => Some(session.token),
            None => self.stored_token()?,
        };

        if let Some(token) = token {
            if let Err(err) = self.store.logout(&token).await {
                tracing::warn!(error = %err, "Store logout failed");
            }
        }

        self.storage.remove(TOKEN_KEY)?;
        Ok(())
    }

    pub async fn update_profile(&self, update: &UserProfileUpdate) -> Result<User, ClientError> {
        let token = self.require_token().await?;
        let user = self.store.update_profile(&token, update).await?;

        if let Some(session) = self.session.write().await.as_mut() {
            session.user = user.clone();
        }
        Ok(user)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let token = self.require_token().await?;
        self.store
            .change_password(&token, current_password, new_password)
            .await
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn begin(&self, auth: AuthResponse) -> Result<Session, ClientError> {
        let session = Session::from(auth);
        self.storage.set(TOKEN_KEY, &session.token)?;
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Persisted token, discarding it if it cannot be read back
    fn stored_token(&self) -> Result<Option<String>, ClientError> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => Ok(token),
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable token");
                self.storage.remove(TOKEN_KEY)?;
                Ok(None)
            }
        }
    }

    async fn require_token(&self) -> Result<String, ClientError> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| ClientError::Unauthenticated("Not logged in".to_string()))
    }
}

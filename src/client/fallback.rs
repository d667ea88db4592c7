//! Primary/secondary store adapter

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use super::{AccountStore, ClientError, DynAccountStore};
use crate::models::{AuthResponse, User, UserProfileUpdate};

/// Runs every call on `primary`, retrying on `secondary` only when the
/// primary could not be reached. Errors reported by the primary are final.
/// Logout is the exception: it runs on both stores.
pub struct FallbackStore {
    primary: DynAccountStore,
    secondary: DynAccountStore,
}

impl FallbackStore {
    pub fn new(primary: DynAccountStore, secondary: DynAccountStore) -> Self {
        Self { primary, secondary }
    }

    pub fn boxed(primary: DynAccountStore, secondary: DynAccountStore) -> DynAccountStore {
        Arc::new(Self::new(primary, secondary))
    }

    async fn run<'a, T, F, Fut>(&'a self, operation: &'static str, call: F) -> Result<T, ClientError>
    where
        F: Fn(&'a dyn AccountStore) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        match call(self.primary.as_ref()).await {
            Err(ClientError::Transport(reason)) => {
                tracing::warn!(operation, %reason, "API unreachable, using local account store");
                call(self.secondary.as_ref()).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl AccountStore for FallbackStore {
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.run("signup", |s| s.signup(name, email, password)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.run("login", |s| s.login(email, password)).await
    }

    async fn current_user(&self, token: &str) -> Result<User, ClientError> {
        self.run("current_user", |s| s.current_user(token)).await
    }

    async fn update_profile(&self, token: &str, update: &UserProfileUpdate) -> Result<User, ClientError> {
        self.run("update_profile", |s| s.update_profile(token, update)).await
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        self.run("change_password", |s| {
            s.change_password(token, current_password, new_password)
        })
        .await
    }

    /// Logout never needs the network, so both stores end their session.
    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let primary = self.primary.logout(token).await;
        let secondary = self.secondary.logout(token).await;
        primary.and(secondary)
    }
}

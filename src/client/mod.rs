//! Client session layer
//!
//! Account operations go through the [`AccountStore`] trait:
//! - [`RemoteStore`] talks to the HTTP API
//! - [`LocalStore`] keeps accounts in client storage
//! - [`FallbackStore`] prefers one and falls back to the other when the API
//!   is unreachable
//!
//! [`AuthProvider`] sits on top and owns the current [`Session`].

mod error;
pub mod fallback;
pub mod local;
pub mod remote;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{AuthResponse, User, UserProfileUpdate};

pub use error::ClientError;
pub use fallback::FallbackStore;
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use session::{AuthProvider, Session};
pub use storage::{DynStorage, FileStorage, MemoryStorage, Storage};

/// Account operations available to a client
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError>;

    /// Resolve a token to its user
    async fn current_user(&self, token: &str) -> Result<User, ClientError>;

    async fn update_profile(&self, token: &str, update: &UserProfileUpdate) -> Result<User, ClientError>;

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError>;

    async fn logout(&self, token: &str) -> Result<(), ClientError>;
}

/// Type alias for a shared account store
pub type DynAccountStore = Arc<dyn AccountStore>;

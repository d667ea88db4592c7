//! Offline account store
//!
//! Keeps accounts in client [`Storage`] so the session layer keeps working
//! when the API cannot be reached. Responses, defaults and errors mirror the
//! server's. A demo account is seeded the first time the store is used.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::storage::DynStorage;
use super::{AccountStore, ClientError};
use crate::config::DEFAULT_ADMIN_EMAIL;
use crate::models::{AuthResponse, User, UserProfileUpdate, UserRole};
use crate::services::auth::validate_signup;
use crate::services::{hash_password, normalize_email, verify_password, SignupInput};

/// Storage key holding the JSON array of accounts
pub const USERS_KEY: &str = "cloud_apex_users";
/// Storage key holding the active local token
pub const SESSION_KEY: &str = "cloud_apex_session";

const TOKEN_PREFIX: &str = "local.";

pub const DEMO_EMAIL: &str = "alex.chen@cloudapex.com";
pub const DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalAccount {
    user: User,
    password_hash: String,
}

pub struct LocalStore {
    storage: DynStorage,
    admin_email: String,
    // Serializes read-modify-write cycles on the account list
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(storage: DynStorage) -> Self {
        Self::with_admin_email(storage, DEFAULT_ADMIN_EMAIL)
    }

    pub fn with_admin_email(storage: DynStorage, admin_email: impl Into<String>) -> Self {
        Self {
            storage,
            admin_email: normalize_email(&admin_email.into()),
            write_lock: Mutex::new(()),
        }
    }

    fn load_accounts(&self) -> Result<Vec<LocalAccount>, ClientError> {
        match self.storage.get(USERS_KEY)? {
            Some(raw) => {
                let accounts = serde_json::from_str(&raw).context("Corrupt local account store")?;
                Ok(accounts)
            }
            None => {
                let accounts = vec![demo_account()?];
                self.save_accounts(&accounts)?;
                Ok(accounts)
            }
        }
    }

    fn save_accounts(&self, accounts: &[LocalAccount]) -> Result<(), ClientError> {
        let raw = serde_json::to_string(accounts).context("Failed to encode local accounts")?;
        self.storage.set(USERS_KEY, &raw)?;
        Ok(())
    }

    fn start_session(&self, user: User) -> Result<AuthResponse, ClientError> {
        let token = format!("{}{}", TOKEN_PREFIX, user.id);
        self.storage.set(SESSION_KEY, &token)?;
        Ok(AuthResponse { token, user })
    }

    /// Resolve a local token to the index of its account
    fn authenticate(&self, accounts: &[LocalAccount], token: &str) -> Result<usize, ClientError> {
        let id = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| ClientError::Unauthenticated("Invalid token".to_string()))?;

        if self.storage.get(SESSION_KEY)?.as_deref() != Some(token) {
            return Err(ClientError::Unauthenticated("No active session".to_string()));
        }

        accounts
            .iter()
            .position(|a| a.user.id == id)
            .ok_or_else(|| ClientError::NotFound("User not found".to_string()))
    }
}

fn demo_account() -> Result<LocalAccount, ClientError> {
    let password_hash = hash_password(DEMO_PASSWORD).context("Failed to hash demo password")?;

    let mut user = User::new(
        "1".to_string(),
        "Alex Chen".to_string(),
        DEMO_EMAIL.to_string(),
        String::new(),
        UserRole::Student,
    );
    user.location = "San Francisco, CA".to_string();
    user.level = 12;
    user.xp = 4500;
    user.total_xp = 5000;
    user.bio = "Passionate about cloud architecture and automation. \
                Currently mastering Kubernetes and Terraform."
        .to_string();

    Ok(LocalAccount {
        user,
        password_hash,
    })
}

#[async_trait]
impl AccountStore for LocalStore {
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let input = SignupInput::new(name, email, password);
        validate_signup(&input)?;

        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_accounts()?;

        let email = normalize_email(email);
        if accounts.iter().any(|a| a.user.email == email) {
            return Err(ClientError::Conflict("User already exists".to_string()));
        }

        let role = if email == self.admin_email {
            UserRole::Admin
        } else {
            UserRole::Student
        };
        let password_hash = hash_password(password).context("Failed to hash password")?;
        let user = User::new(
            Uuid::new_v4().to_string(),
            name.trim().to_string(),
            email,
            String::new(),
            role,
        );

        accounts.push(LocalAccount {
            user: user.clone(),
            password_hash,
        });
        self.save_accounts(&accounts)?;

        tracing::debug!(user_id = %user.id, "Local account created");
        self.start_session(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let accounts = {
            let _guard = self.write_lock.lock().await;
            self.load_accounts()?
        };

        let email = normalize_email(email);
        let account = accounts
            .into_iter()
            .find(|a| a.user.email == email)
            .ok_or_else(|| ClientError::NotFound("User not found".to_string()))?;

        let valid = verify_password(password, &account.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(ClientError::InvalidCredentials("Invalid password".to_string()));
        }

        self.start_session(account.user)
    }

    async fn current_user(&self, token: &str) -> Result<User, ClientError> {
        let _guard = self.write_lock.lock().await;
        let accounts = self.load_accounts()?;
        let index = self.authenticate(&accounts, token)?;
        Ok(accounts[index].user.clone())
    }

    async fn update_profile(&self, token: &str, update: &UserProfileUpdate) -> Result<User, ClientError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(ClientError::Validation("Name cannot be empty".to_string()));
            }
        }

        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_accounts()?;
        let index = self.authenticate(&accounts, token)?;

        let user = &mut accounts[index].user;
        user.apply_profile_update(update);
        user.updated_at = chrono::Utc::now();
        let updated = user.clone();

        self.save_accounts(&accounts)?;
        Ok(updated)
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_accounts()?;
        let index = self.authenticate(&accounts, token)?;

        let valid = verify_password(current_password, &accounts[index].password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(ClientError::InvalidCredentials("Invalid password".to_string()));
        }
        if new_password.is_empty() {
            return Err(ClientError::Validation(
                "New password cannot be empty".to_string(),
            ));
        }

        accounts[index].password_hash =
            hash_password(new_password).context("Failed to hash password")?;
        self.save_accounts(&accounts)
    }

    async fn logout(&self, _token: &str) -> Result<(), ClientError> {
        self.storage.remove(SESSION_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::{FileStorage, MemoryStorage, Storage};
    use std::sync::Arc;

    fn store() -> (LocalStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (LocalStore::new(storage.clone()), storage)
    }

    #[tokio::test]
    async fn test_demo_account_is_seeded() {
        let (store, storage) = store();

        let auth = store.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        assert_eq!(auth.token, "local.1");
        assert_eq!(auth.user.name, "Alex Chen");
        assert_eq!(auth.user.level, 12);
        assert_eq!(auth.user.total_xp, 5000);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), Some("local.1".to_string()));
        assert!(storage.get(USERS_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_signup_mirrors_server_defaults() {
        let (store, _) = store();

        let auth = store.signup("Sam", " Sam@X.com ", "secret123").await.unwrap();

        assert_eq!(auth.user.email, "sam@x.com");
        assert_eq!(auth.user.role, UserRole::Student);
        assert_eq!(auth.user.location, "Remote");
        assert_eq!(auth.user.level, 1);
        assert_eq!(auth.user.xp, 0);
        assert_eq!(auth.user.total_xp, 1000);
        assert_eq!(store.current_user(&auth.token).await.unwrap(), auth.user);

        let admin = store.signup("Dana", "admin@cloudapex.com", "secret123").await.unwrap();
        assert_eq!(admin.user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_signup_errors() {
        let (store, _) = store();

        let dup = store.signup("Alex", DEMO_EMAIL, "secret123").await;
        assert!(matches!(dup, Err(ClientError::Conflict(_))));

        let blank = store.signup("", "a@x.com", "secret123").await;
        assert!(matches!(blank, Err(ClientError::Validation(_))));

        let bad_email = store.signup("A", "not-an-email", "secret123").await;
        assert!(matches!(bad_email, Err(ClientError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_errors() {
        let (store, _) = store();

        let missing = store.login("ghost@x.com", "secret123").await;
        assert!(matches!(missing, Err(ClientError::NotFound(_))));

        let wrong = store.login(DEMO_EMAIL, "nope").await;
        assert!(matches!(wrong, Err(ClientError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_token_checks() {
        let (store, _) = store();
        let auth = store.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let foreign = store.current_user("eyJhbGciOiJIUzI1NiJ9.x.y").await;
        assert!(matches!(foreign, Err(ClientError::Unauthenticated(_))));

        store.logout(&auth.token).await.unwrap();
        let stale = store.current_user(&auth.token).await;
        assert!(matches!(stale, Err(ClientError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_profile_and_password() {
        let (store, _) = store();
        let auth = store.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let update = UserProfileUpdate {
            location: Some("Berlin".to_string()),
            ..Default::default()
        };
        let first = store.update_profile(&auth.token, &update).await.unwrap();
        let second = store.update_profile(&auth.token, &update).await.unwrap();
        assert_eq!(first.location, "Berlin");
        assert_eq!(second.location, "Berlin");
        assert_eq!(second.bio, auth.user.bio);

        let blank = UserProfileUpdate {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        let result = store.update_profile(&auth.token, &blank).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));

        let wrong = store.change_password(&auth.token, "nope", "next456").await;
        assert!(matches!(wrong, Err(ClientError::InvalidCredentials(_))));

        store
            .change_password(&auth.token, DEMO_PASSWORD, "next456")
            .await
            .unwrap();
        assert!(store.login(DEMO_EMAIL, "next456").await.is_ok());
        assert!(store.login(DEMO_EMAIL, DEMO_PASSWORD).await.is_err());
    }

    #[tokio::test]
    async fn test_accounts_survive_restart() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let first = LocalStore::new(Arc::new(FileStorage::new(dir.path()).unwrap()));
        first.signup("Sam", "sam@x.com", "secret123").await.unwrap();

        let second = LocalStore::new(Arc::new(FileStorage::new(dir.path()).unwrap()));
        let auth = second.login("sam@x.com", "secret123").await.unwrap();

        assert_eq!(auth.user.name, "Sam");
    }
}

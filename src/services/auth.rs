//! Account service
//!
//! Business logic for accounts:
//! - Signup with a reserved admin address
//! - Login returning a signed session token
//! - Resolving a token to the current user
//! - Profile updates and password changes
//!
//! Token-bearing operations are split in two steps: [`AuthService::current_user`]
//! resolves the token once, and the mutating operations take the resolved user.

use crate::db::repositories::UserRepository;
use crate::models::{AuthResponse, User, UserProfileUpdate, UserRole};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::{TokenError, TokenService};
use anyhow::Context;
use std::sync::Arc;
use uuid::Uuid;

/// Error types for account operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    ValidationError(String),

    /// Email already registered
    #[error("User already exists")]
    UserExists,

    /// No account for the given email or token subject
    #[error("User not found")]
    UserNotFound,

    /// Password did not match
    #[error("Invalid password")]
    InvalidCredentials,

    /// Missing, malformed or expired token
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<TokenError> for AuthServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Unauthenticated("Session expired".to_string()),
            TokenError::Invalid(_) => Self::Unauthenticated("Invalid token".to_string()),
            TokenError::Encode(msg) => Self::InternalError(anyhow::anyhow!(msg)),
        }
    }
}

/// Account service
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    admin_email: String,
}

impl AuthService {
    /// Create a new account service.
    ///
    /// Signups using `admin_email` (case-insensitive) receive the Admin role.
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            user_repo,
            tokens,
            admin_email: normalize_email(&admin_email.into()),
        }
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if a field is blank or the email has no `@`
    /// - `UserExists` if the email is already registered
    pub async fn signup(&self, input: SignupInput) -> Result<AuthResponse, AuthServiceError> {
        validate_signup(&input)?;

        let email = normalize_email(&input.email);

        if self
            .user_repo
            .get_by_email(&email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(AuthServiceError::UserExists);
        }

        let role = if email == self.admin_email {
            UserRole::Admin
        } else {
            UserRole::Student
        };

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;
        let user = User::new(
            Uuid::new_v4().to_string(),
            input.name.trim().to_string(),
            email,
            password_hash,
            role,
        );

        // A concurrent signup can still lose the race on the UNIQUE constraint.
        let created = match self.user_repo.create(&user).await {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => return Err(AuthServiceError::UserExists),
            Err(e) => return Err(e.context("Failed to create user").into()),
        };

        tracing::info!(user_id = %created.id, role = %created.role, "Account created");

        let token = self.tokens.issue(&created)?;
        Ok(AuthResponse { token, user: created })
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no account uses the email
    /// - `InvalidCredentials` if the password does not match
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AuthServiceError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "Email and password are required".to_string(),
            ));
        }

        let user = self
            .user_repo
            .get_by_email(&normalize_email(&input.email))
            .await
            .context("Failed to get user by email")?
            .ok_or(AuthServiceError::UserNotFound)?;

        let valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse { token, user })
    }

    /// Resolve a session token to its user.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the token is missing, malformed or expired
    /// - `UserNotFound` if the account no longer exists
    pub async fn current_user(&self, token: &str) -> Result<User, AuthServiceError> {
        if token.trim().is_empty() {
            return Err(AuthServiceError::Unauthenticated(
                "Authentication required".to_string(),
            ));
        }

        let claims = self.tokens.verify(token)?;

        self.user_repo
            .get_by_id(&claims.sub)
            .await
            .context("Failed to get user")?
            .ok_or(AuthServiceError::UserNotFound)
    }

    /// Apply a partial profile update.
    ///
    /// Absent fields are untouched, so applying the same update twice leaves
    /// the same state.
    pub async fn update_profile(
        &self,
        user: &User,
        update: UserProfileUpdate,
    ) -> Result<User, AuthServiceError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AuthServiceError::ValidationError(
                    "Name cannot be empty".to_string(),
                ));
            }
        }

        let mut current = self.reload(user).await?;
        current.apply_profile_update(&update);

        let updated = self
            .user_repo
            .update_profile(&current)
            .await
            .context("Failed to update profile")?;

        Ok(updated)
    }

    /// Rotate the password after re-checking the current one.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` if `current_password` does not match
    /// - `ValidationError` if `new_password` is empty
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthServiceError> {
        let current = self.reload(user).await?;

        let valid = verify_password(current_password, &current.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if new_password.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "New password cannot be empty".to_string(),
            ));
        }

        let hash = hash_password(new_password).context("Failed to hash password")?;
        self.user_repo
            .update_password(&current.id, &hash)
            .await
            .context("Failed to update password")?;

        tracing::info!(user_id = %current.id, "Password changed");
        Ok(())
    }

    async fn reload(&self, user: &User) -> Result<User, AuthServiceError> {
        self.user_repo
            .get_by_id(&user.id)
            .await
            .context("Failed to get user")?
            .ok_or(AuthServiceError::UserNotFound)
    }
}

pub(crate) fn validate_signup(input: &SignupInput) -> Result<(), AuthServiceError> {
    if input.name.trim().is_empty() {
        return Err(AuthServiceError::ValidationError(
            "Name cannot be empty".to_string(),
        ));
    }

    if input.email.trim().is_empty() {
        return Err(AuthServiceError::ValidationError(
            "Email cannot be empty".to_string(),
        ));
    }

    if input.password.is_empty() {
        return Err(AuthServiceError::ValidationError(
            "Password cannot be empty".to_string(),
        ));
    }

    if !input.email.contains('@') {
        return Err(AuthServiceError::ValidationError(
            "Invalid email format".to_string(),
        ));
    }

    Ok(())
}

/// Emails are stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .map(|db| db.is_unique_violation())
            .unwrap_or(false)
    })
}

/// Input for signup
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Input for login
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}


// ============================================================================
// Property-based tests
// ============================================================================

//! User model
//!
//! Accounts are created at signup and mutated by profile updates and password
//! changes. They are never deleted through the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default location assigned to new accounts
pub const DEFAULT_LOCATION: &str = "Remote";
/// Starting level of every account
pub const DEFAULT_LEVEL: i64 = 1;
/// Starting experience of every account
pub const DEFAULT_XP: i64 = 0;
/// Experience required for the first level-up
pub const DEFAULT_TOTAL_XP: i64 = 1000;

/// A registered user.
///
/// The password hash is never serialized, so a `User` can be returned from
/// the API as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier (UUID v4)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2 PHC string)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub location: String,
    pub avatar: String,
    pub level: i64,
    pub xp: i64,
    pub total_xp: i64,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with the starting stats.
    ///
    /// The password must already be hashed, see `services::password::hash_password()`.
    pub fn new(id: String, name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        let avatar = default_avatar(&name);
        Self {
            id,
            name,
            email,
            password_hash,
            role,
            location: DEFAULT_LOCATION.to_string(),
            avatar,
            level: DEFAULT_LEVEL,
            xp: DEFAULT_XP,
            total_xp: DEFAULT_TOTAL_XP,
            bio: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial profile update in place.
    ///
    /// Fields that are `None` are left untouched.
    pub fn apply_profile_update(&mut self, update: &UserProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(bio) = &update.bio {
            self.bio = bio.clone();
        }
        if let Some(location) = &update.location {
            self.location = location.clone();
        }
        if let Some(avatar) = &update.avatar {
            self.avatar = avatar.clone();
        }
    }
}

/// Avatar URL generated from the display name.
pub fn default_avatar(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(name)
    )
}

/// User role for authorization.
///
/// Only blog mutation is gated on the role, through [`UserRole::can_manage_blogs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

impl UserRole {
    /// Whether this role may create and delete blog posts
    pub fn can_manage_blogs(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "Student"),
            UserRole::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "admin" => Ok(UserRole::Admin),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Partial profile update.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfileUpdate {
    /// Check if the update carries no fields
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.location.is_none() && self.avatar.is_none()
    }
}

/// Token plus account, returned by signup and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "id-1".to_string(),
            "Alex Chen".to_string(),
            "alex@x.com".to_string(),
            "hash".to_string(),
            UserRole::Student,
        )
    }

    #[test]
    fn test_user_new_defaults() {
        let user = sample_user();

        assert_eq!(user.location, "Remote");
        assert_eq!(user.level, 1);
        assert_eq!(user.xp, 0);
        assert_eq!(user.total_xp, 1000);
        assert_eq!(user.bio, "");
        assert_eq!(
            user.avatar,
            "https://ui-avatars.com/api/?name=Alex%20Chen&background=random"
        );
    }

    #[test]
    fn test_user_serialization_hides_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["totalXp"], 1000);
        assert_eq!(json["role"], "Student");
    }

    #[test]
    fn test_user_deserializes_from_api_shape() {
        let json = serde_json::json!({
            "id": "abc",
            "name": "Alex",
            "email": "alex@x.com",
            "role": "Admin",
            "location": "Remote",
            "avatar": "a",
            "level": 1,
            "xp": 0,
            "totalXp": 1000
        });
        let user: User = serde_json::from_value(json).unwrap();

        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.password_hash, "");
        assert_eq!(user.bio, "");
    }

    #[test]
    fn test_role_can_manage_blogs() {
        assert!(UserRole::Admin.can_manage_blogs());
        assert!(!UserRole::Student.can_manage_blogs());
    }

    #[test]
    fn test_user_role_from_str() {
        assert_eq!(UserRole::from_str("Admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("student").unwrap(), UserRole::Student);
        assert!(UserRole::from_str("editor").is_err());
    }

    #[test]
    fn test_user_role_display_round_trips() {
        for role in [UserRole::Student, UserRole::Admin] {
            assert_eq!(UserRole::from_str(&role.to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_apply_profile_update_is_partial() {
        let mut user = sample_user();
        let update = UserProfileUpdate {
            bio: Some("Learning Terraform".to_string()),
            ..Default::default()
        };

        user.apply_profile_update(&update);

        assert_eq!(user.name, "Alex Chen");
        assert_eq!(user.bio, "Learning Terraform");
        assert_eq!(user.location, "Remote");
    }

    #[test]
    fn test_profile_update_is_empty() {
        assert!(UserProfileUpdate::default().is_empty());
        assert!(!UserProfileUpdate {
            location: Some("Berlin".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}

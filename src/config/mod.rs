//! Configuration management
//!
//! Configuration is read from `config.yml` and can be overridden through
//! `CLOUDAPEX_*` environment variables. Missing values fall back to defaults,
//! so an absent or empty file yields a runnable development setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JWT secret used when none is configured. The server logs a warning when it
/// starts with this value.
pub const DEFAULT_JWT_SECRET: &str = "cloudapex-development-secret-change-me";

/// Address granted the Admin role unless configured otherwise
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@cloudapex.com";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token and account configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Directory holding the built frontend
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path or `sqlite:` URL (`:memory:` for an in-memory store)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/cloudapex.db".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// The one address that is granted the Admin role at signup
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            admin_email: default_admin_email(),
        }
    }
}

impl AuthConfig {
    /// Whether the built-in development secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl_hours() -> i64 {
    7 * 24
}

fn default_admin_email() -> String {
    DEFAULT_ADMIN_EMAIL.to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns the default configuration.
    /// Invalid YAML is reported with its location.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Recognized variables:
    /// - CLOUDAPEX_SERVER_HOST
    /// - CLOUDAPEX_SERVER_PORT
    /// - CLOUDAPEX_SERVER_CORS_ORIGIN
    /// - CLOUDAPEX_SERVER_STATIC_DIR
    /// - CLOUDAPEX_DATABASE_URL
    /// - CLOUDAPEX_AUTH_JWT_SECRET
    /// - CLOUDAPEX_AUTH_TOKEN_TTL_HOURS
    /// - CLOUDAPEX_AUTH_ADMIN_EMAIL
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret must not be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CLOUDAPEX_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CLOUDAPEX_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("CLOUDAPEX_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }
        if let Ok(dir) = std::env::var("CLOUDAPEX_SERVER_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }

        if let Ok(url) = std::env::var("CLOUDAPEX_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secret) = std::env::var("CLOUDAPEX_AUTH_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(ttl) = std::env::var("CLOUDAPEX_AUTH_TOKEN_TTL_HOURS") {
            if let Ok(ttl) = ttl.parse::<i64>() {
                self.auth.token_ttl_hours = ttl;
            }
        }
        if let Ok(email) = std::env::var("CLOUDAPEX_AUTH_ADMIN_EMAIL") {
            self.auth.admin_email = email;
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_VARS: &[&str] = &[
        "CLOUDAPEX_SERVER_HOST",
        "CLOUDAPEX_SERVER_PORT",
        "CLOUDAPEX_SERVER_CORS_ORIGIN",
        "CLOUDAPEX_SERVER_STATIC_DIR",
        "CLOUDAPEX_DATABASE_URL",
        "CLOUDAPEX_AUTH_JWT_SECRET",
        "CLOUDAPEX_AUTH_TOKEN_TTL_HOURS",
        "CLOUDAPEX_AUTH_ADMIN_EMAIL",
    ];

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        let guard = super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        guard
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, PathBuf::from("dist"));
        assert_eq!(config.database.url, "data/cloudapex.db");
        assert_eq!(config.auth.token_ttl_hours, 168);
        assert_eq!(config.auth.admin_email, "admin@cloudapex.com");
        assert!(config.auth.uses_default_secret());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "auth:\n  admin_email: \"root@example.com\"\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.auth.admin_email, "root@example.com");
        assert_eq!(config.auth.token_ttl_hours, 168);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 9000
  cors_origin: "https://cloudapex.com"
  static_dir: "public"
database:
  url: "sqlite:/var/lib/cloudapex.db"
auth:
  jwt_secret: "s3cret"
  token_ttl_hours: 12
  admin_email: "ops@cloudapex.com"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origin, "https://cloudapex.com");
        assert_eq!(config.server.static_dir, PathBuf::from("public"));
        assert_eq!(config.database.url, "sqlite:/var/lib/cloudapex.db");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_ttl_hours, 12);
        assert_eq!(config.auth.admin_email, "ops@cloudapex.com");
        assert!(!config.auth.uses_default_secret());
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not_a_number\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_rejects_non_positive_ttl() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "auth:\n  token_ttl_hours: 0\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("token_ttl_hours"));
    }

    #[test]
    fn test_env_override_server_and_auth() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8080\n").unwrap();

        std::env::set_var("CLOUDAPEX_SERVER_HOST", "192.168.1.1");
        std::env::set_var("CLOUDAPEX_SERVER_PORT", "4000");
        std::env::set_var("CLOUDAPEX_AUTH_JWT_SECRET", "from-env");
        std::env::set_var("CLOUDAPEX_AUTH_ADMIN_EMAIL", "boss@cloudapex.com");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.auth.admin_email, "boss@cloudapex.com");

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_override_invalid_numbers_ignored() {
        let _guard = lock_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8081\n").unwrap();

        std::env::set_var("CLOUDAPEX_SERVER_PORT", "not_a_number");
        std::env::set_var("CLOUDAPEX_AUTH_TOKEN_TTL_HOURS", "forever");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.auth.token_ttl_hours, 168);

        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }
}

//! Client-side error taxonomy

use crate::api::ApiError;
use crate::services::AuthServiceError;

/// Errors returned by account stores and the auth provider.
///
/// Only [`ClientError::Transport`] triggers the local fallback; every other
/// variant is a definitive answer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be completed (connect, timeout, I/O)
    #[error("Network error: {0}")]
    Transport(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    /// Server-side failure without a more specific code
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Restore the typed error from an API error body
    pub fn from_api(status: u16, body: ApiError) -> Self {
        match body.code.as_str() {
            "VALIDATION_ERROR" => Self::Validation(body.error),
            "CONFLICT" => Self::Conflict(body.error),
            "NOT_FOUND" => Self::NotFound(body.error),
            "INVALID_CREDENTIALS" => Self::InvalidCredentials(body.error),
            "UNAUTHORIZED" => Self::Unauthenticated(body.error),
            "FORBIDDEN" => Self::Forbidden(body.error),
            _ => Self::Server {
                status,
                message: body.error,
            },
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Internal(anyhow::anyhow!("Unexpected response body: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The local store reports the same failures as the server
impl From<AuthServiceError> for ClientError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::ValidationError(msg) => Self::Validation(msg),
            AuthServiceError::UserExists => Self::Conflict(err.to_string()),
            AuthServiceError::UserNotFound => Self::NotFound(err.to_string()),
            AuthServiceError::InvalidCredentials => Self::InvalidCredentials(err.to_string()),
            AuthServiceError::Unauthenticated(msg) => Self::Unauthenticated(msg),
            AuthServiceError::InternalError(e) => Self::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_codes() {
        let err = ClientError::from_api(409, ApiError::conflict("User already exists"));
        assert!(matches!(err, ClientError::Conflict(ref msg) if msg == "User already exists"));

        let err = ClientError::from_api(401, ApiError::invalid_credentials("Invalid password"));
        assert!(matches!(err, ClientError::InvalidCredentials(_)));

        let err = ClientError::from_api(401, ApiError::unauthorized("Invalid token"));
        assert!(matches!(err, ClientError::Unauthenticated(_)));

        let err = ClientError::from_api(500, ApiError::internal_error("boom"));
        assert!(matches!(err, ClientError::Server { status: 500, .. }));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_from_auth_service_error() {
        let err = ClientError::from(AuthServiceError::UserExists);
        assert!(matches!(err, ClientError::Conflict(ref msg) if msg == "User already exists"));

        let err = ClientError::from(AuthServiceError::InvalidCredentials);
        assert!(matches!(err, ClientError::InvalidCredentials(ref msg) if msg == "Invalid password"));
    }
}

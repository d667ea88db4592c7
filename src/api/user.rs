//! Account self-service endpoints (bearer token required)
//!
//! - PUT /api/user/profile - Partial profile update
//! - POST /api/user/change-password - Rotate the password

use axum::{
    extract::{Extension, State},
    routing::{post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};
use crate::models::{User, UserProfileUpdate};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `{"message": ...}` body for operations without a resource to return
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", put(update_profile))
        .route("/change-password", post(change_password))
}

/// PUT /api/user/profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<UserProfileUpdate>,
) -> Result<Json<User>, ApiError> {
    let updated = state.auth_service.update_profile(&user.0, body).await?;
    Ok(Json(updated))
}

/// POST /api/user/change-password
async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .auth_service
        .change_password(&user.0, &body.current_password, &body.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated")))
}

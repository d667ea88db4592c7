//! Authentication API endpoints
//!
//! - POST /api/auth/signup - Create an account
//! - POST /api/auth/login - Sign in
//! - GET /api/auth/me - Current user (bearer token)

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};
use crate::models::{AuthResponse, User};
use crate::services::{LoginInput, SignupInput};

/// Request body for signup
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public auth routes
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Auth routes behind `require_auth`
pub fn protected_router() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// POST /api/auth/signup
async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .auth_service
        .signup(SignupInput::new(body.name, body.email, body.password))
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = state
        .auth_service
        .login(LoginInput::new(body.email, body.password))
        .await?;

    Ok(Json(response))
}

/// GET /api/auth/me
async fn get_current_user(Extension(user): Extension<AuthenticatedUser>) -> Json<User> {
    Json(user.0)
}

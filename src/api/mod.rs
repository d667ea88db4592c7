//! API layer - HTTP handlers and routing
//!
//! All endpoints live under `/api`:
//! - Auth endpoints (signup, login, current user)
//! - Account self-service (profile, password)
//! - Blog endpoints
//! - Contact and enrollment form intake
//!
//! Every other path serves the frontend.

pub mod auth;
pub mod blogs;
pub mod forms;
pub mod middleware;
pub mod static_files;
pub mod user;

#[cfg(test)]
mod tests;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use chrono::Duration;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AuthConfig;
use crate::db::repositories::{
    SqlxBlogRepository, SqlxContactRepository, SqlxEnrollmentRepository, SqlxUserRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{AuthService, BlogService, ContactService, EnrollmentService, TokenService};

pub use middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};
pub use user::MessageResponse;

/// Wire repositories and services into the shared application state
pub fn build_state(pool: DynDatabasePool, auth: &AuthConfig, static_dir: PathBuf) -> AppState {
    let tokens = Arc::new(TokenService::new(
        &auth.jwt_secret,
        Duration::hours(auth.token_ttl_hours),
    ));

    AppState {
        auth_service: Arc::new(AuthService::new(
            SqlxUserRepository::boxed(pool.clone()),
            tokens,
            auth.admin_email.clone(),
        )),
        blog_service: Arc::new(BlogService::new(SqlxBlogRepository::boxed(pool.clone()))),
        contact_service: Arc::new(ContactService::new(SqlxContactRepository::boxed(pool.clone()))),
        enrollment_service: Arc::new(EnrollmentService::new(SqlxEnrollmentRepository::boxed(pool))),
        static_dir: Arc::new(static_dir),
    }
}

/// Build the API router (mounted at `/api`)
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Routes that need a bearer token
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/user", user::router())
        .merge(blogs::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    Router::new()
        .nest("/auth", auth::public_router())
        .merge(blogs::public_router())
        .merge(forms::router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .nest("/api", build_api_router(state.clone()))
        .fallback(static_files::serve_static)
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origin; `*` allows any origin
fn cors_layer(cors_origin: &str) -> CorsLayer {
    let origin = if cors_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any origin", cors_origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

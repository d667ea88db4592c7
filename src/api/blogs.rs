//! Blog API endpoints
//!
//! - GET /api/blogs - All posts, newest first
//! - POST /api/blogs - Publish a post (Admin)
//! - DELETE /api/blogs/{id} - Delete a post (Admin)

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};
use crate::api::user::MessageResponse;
use crate::models::{BlogPost, CreateBlogInput};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/blogs", get(list_blogs))
}

/// Mutating routes. Role checks happen in the service.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/blogs", post(create_blog))
        .route("/blogs/{id}", delete(delete_blog))
}

async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    Ok(Json(state.blog_service.list().await?))
}

async fn create_blog(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<CreateBlogInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.blog_service.create(&user.0, body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn delete_blog(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.blog_service.delete(&user.0, &id).await?;
    Ok(Json(MessageResponse::new("Blog post deleted")))
}

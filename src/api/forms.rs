//! Public form intake
//!
//! - POST /api/contact - Contact form
//! - POST /api/enrollments - Course enrollment application

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::api::middleware::{ApiError, ApiJson, AppState};
use crate::api::user::MessageResponse;
use crate::models::{ContactSubmission, EnrollmentSubmission};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_contact))
        .route("/enrollments", post(submit_enrollment))
}

async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactSubmission>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.contact_service.submit(body).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Message received"))))
}

async fn submit_enrollment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<EnrollmentSubmission>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.enrollment_service.submit(body).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Application received"))))
}

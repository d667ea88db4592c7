//! Enrollment application service

use crate::db::repositories::EnrollmentRepository;
use crate::models::{EnrollmentApplication, EnrollmentSubmission, KNOWN_TRACKS};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum EnrollmentServiceError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct EnrollmentService {
    repo: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    pub fn new(repo: Arc<dyn EnrollmentRepository>) -> Self {
        Self { repo }
    }

    /// Store an enrollment application. Full name and email are required.
    pub async fn submit(
        &self,
        submission: EnrollmentSubmission,
    ) -> Result<EnrollmentApplication, EnrollmentServiceError> {
        if submission.full_name.trim().is_empty() {
            return Err(EnrollmentServiceError::ValidationError(
                "Full name is required".to_string(),
            ));
        }
        if submission.email.trim().is_empty() {
            return Err(EnrollmentServiceError::ValidationError(
                "Email is required".to_string(),
            ));
        }

        if !KNOWN_TRACKS.contains(&submission.track.as_str()) {
            tracing::debug!(track = %submission.track, "Enrollment for unlisted track");
        }

        let application = EnrollmentApplication {
            id: Uuid::new_v4().to_string(),
            full_name: submission.full_name.trim().to_string(),
            email: submission.email.trim().to_string(),
            phone: submission.phone,
            track: submission.track,
            experience: submission.experience,
            motivation: submission.motivation,
            date: Utc::now(),
        };

        let stored = self
            .repo
            .create(&application)
            .await
            .context("Failed to submit enrollment")?;
        tracing::info!(application_id = %stored.id, track = %stored.track, "Enrollment received");

        Ok(stored)
    }
}

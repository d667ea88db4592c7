//! Contact form service

use crate::db::repositories::ContactRepository;
use crate::models::{ContactInquiry, ContactSubmission};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// Store a contact form submission as-is
    pub async fn submit(&self, submission: ContactSubmission) -> Result<ContactInquiry> {
        let inquiry = ContactInquiry {
            id: Uuid::new_v4().to_string(),
            name: submission.name,
            email: submission.email,
            subject: submission.subject,
            message: submission.message,
            date: Utc::now(),
        };

        let stored = self.repo.create(&inquiry).await.context("Failed to submit contact form")?;
        tracing::info!(inquiry_id = %stored.id, "Contact inquiry received");

        Ok(stored)
    }
}

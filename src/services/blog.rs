//! Blog service
//!
//! Anyone can read the blog. Creating and deleting posts is gated on
//! [`UserRole::can_manage_blogs`](crate::models::UserRole::can_manage_blogs).

use crate::db::repositories::BlogRepository;
use crate::models::{BlogPost, CreateBlogInput, User};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BlogServiceError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Only administrators can manage blog posts")]
    Forbidden,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// All posts, newest first
    pub async fn list(&self) -> Result<Vec<BlogPost>, BlogServiceError> {
        Ok(self.repo.list().await.context("Failed to list blog posts")?)
    }

    /// Publish a post as `actor`. The author is the actor's display name.
    pub async fn create(
        &self,
        actor: &User,
        input: CreateBlogInput,
    ) -> Result<BlogPost, BlogServiceError> {
        ensure_can_manage(actor)?;

        if input.title.trim().is_empty() {
            return Err(BlogServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(BlogServiceError::ValidationError(
                "Content cannot be empty".to_string(),
            ));
        }

        let post = BlogPost {
            id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            category: input.resolved_category(),
            image: input.resolved_image(),
            content: input.content,
            author: actor.name.clone(),
            date: Utc::now(),
        };

        let created = self.repo.create(&post).await.context("Failed to create blog post")?;
        tracing::info!(post_id = %created.id, author = %created.author, "Blog post published");

        Ok(created)
    }

    /// Delete a post as `actor`. Deleting a missing post succeeds.
    pub async fn delete(&self, actor: &User, id: &str) -> Result<(), BlogServiceError> {
        ensure_can_manage(actor)?;

        let deleted = self.repo.delete(id).await.context("Failed to delete blog post")?;
        if !deleted {
            tracing::debug!(post_id = %id, "Delete requested for unknown blog post");
        }

        Ok(())
    }
}

fn ensure_can_manage(actor: &User) -> Result<(), BlogServiceError> {
    if actor.role.can_manage_blogs() {
        Ok(())
    } else {
        Err(BlogServiceError::Forbidden)
    }
}


// ============================================================================
// Property-based tests
// ============================================================================

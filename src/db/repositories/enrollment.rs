//! Enrollment application repository

use crate::db::DynDatabasePool;
use crate::models::EnrollmentApplication;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn create(&self, application: &EnrollmentApplication) -> Result<EnrollmentApplication>;
    async fn count(&self) -> Result<i64>;
}

pub struct SqlxEnrollmentRepository {
    pool: DynDatabasePool,
}

impl SqlxEnrollmentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn EnrollmentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl EnrollmentRepository for SqlxEnrollmentRepository {
    async fn create(&self, application: &EnrollmentApplication) -> Result<EnrollmentApplication> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (id, full_name, email, phone, track, experience, motivation, date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.track)
        .bind(&application.experience)
        .bind(&application.motivation)
        .bind(application.date)
        .execute(self.pool.sqlite())
        .await
        .context("Failed to store enrollment application")?;

        Ok(application.clone())
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM enrollments")
            .fetch_one(self.pool.sqlite())
            .await
            .context("Failed to count enrollment applications")?;

        Ok(row.get("count"))
    }
}

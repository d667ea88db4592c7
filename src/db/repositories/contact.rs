//! Contact inquiry repository

use crate::db::DynDatabasePool;
use crate::models::ContactInquiry;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, inquiry: &ContactInquiry) -> Result<ContactInquiry>;
    async fn count(&self) -> Result<i64>;
}

pub struct SqlxContactRepository {
    pool: DynDatabasePool,
}

impl SqlxContactRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, inquiry: &ContactInquiry) -> Result<ContactInquiry> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, subject, message, date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&inquiry.id)
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.subject)
        .bind(&inquiry.message)
        .bind(inquiry.date)
        .execute(self.pool.sqlite())
        .await
        .context("Failed to store contact inquiry")?;

        Ok(inquiry.clone())
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM contacts")
            .fetch_one(self.pool.sqlite())
            .await
            .context("Failed to count contact inquiries")?;

        Ok(row.get("count"))
    }
}

//! Blog post repository

use crate::db::DynDatabasePool;
use crate::models::BlogPost;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost>;
    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>>;
    /// All posts, newest first. Posts sharing a date come back in reverse insertion order.
    async fn list(&self) -> Result<Vec<BlogPost>>;
    /// Delete a post. Returns `false` if nothing matched.
    async fn delete(&self, id: &str) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
}

pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> &SqlitePool {
        self.pool.sqlite()
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, post: &BlogPost) -> Result<BlogPost> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, content, author, date, category, image)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .bind(post.date)
        .bind(&post.category)
        .bind(&post.image)
        .execute(self.sqlite())
        .await
        .context("Failed to create blog post")?;

        Ok(post.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<BlogPost>> {
        let row = sqlx::query(
            "SELECT id, title, content, author, date, category, image FROM blogs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.sqlite())
        .await
        .context("Failed to get blog post")?;

        Ok(row.as_ref().map(row_to_post))
    }

    async fn list(&self) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, author, date, category, image
            FROM blogs
            ORDER BY date DESC, rowid DESC
            "#,
        )
        .fetch_all(self.sqlite())
        .await
        .context("Failed to list blog posts")?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(self.sqlite())
            .await
            .context("Failed to delete blog post")?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM blogs")
            .fetch_one(self.sqlite())
            .await
            .context("Failed to count blog posts")?;

        Ok(row.get("count"))
    }
}

fn row_to_post(row: &SqliteRow) -> BlogPost {
    BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        author: row.get("author"),
        date: row.get("date"),
        category: row.get("category"),
        image: row.get("image"),
    }
}

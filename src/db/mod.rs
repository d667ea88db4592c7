//! Database layer
//!
//! All data lives in a single SQLite database reached through the
//! `DatabasePool` trait object. Schema changes are embedded migrations.
//!
//! # Usage
//!
//! ```ignore
//! use cloudapex::config::DatabaseConfig;
//! use cloudapex::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//!
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool, SqliteDatabase};

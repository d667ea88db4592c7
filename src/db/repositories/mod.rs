//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the operations for a single table.

pub mod blog;
pub mod contact;
pub mod enrollment;
pub mod user;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use enrollment::{EnrollmentRepository, SqlxEnrollmentRepository};
pub use user::{SqlxUserRepository, UserRepository};

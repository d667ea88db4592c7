//! Data models
//!
//! This module contains the data structures shared by the server and the
//! client session layer:
//! - Database entities (User, BlogPost, ContactInquiry, EnrollmentApplication)
//! - API request/response types

mod blog;
mod contact;
mod enrollment;
mod user;

pub use blog::{BlogPost, CreateBlogInput, DEFAULT_CATEGORY};
pub use contact::{ContactInquiry, ContactSubmission};
pub use enrollment::{EnrollmentApplication, EnrollmentSubmission, KNOWN_TRACKS};
pub use user::{
    default_avatar, AuthResponse, User, UserProfileUpdate, UserRole, DEFAULT_LEVEL,
    DEFAULT_LOCATION, DEFAULT_TOTAL_XP, DEFAULT_XP,
};

//! Services layer - Business logic
//!
//! Services implement the business rules on top of the repositories:
//! validation, authorization and error classification.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod enrollment;
pub mod password;
pub mod token;

pub use auth::{normalize_email, AuthService, AuthServiceError, LoginInput, SignupInput};
pub use blog::{BlogService, BlogServiceError};
pub use contact::ContactService;
pub use enrollment::{EnrollmentService, EnrollmentServiceError};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

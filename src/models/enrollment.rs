//! Course enrollment application model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learning tracks offered on the enrollment form.
///
/// The track is stored as free text; these are the values the form sends.
pub const KNOWN_TRACKS: &[&str] = &["cloud-arch", "devops-eng", "data-analytics"];

/// A stored enrollment application. Write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentApplication {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub track: String,
    pub experience: String,
    pub motivation: String,
    pub date: DateTime<Utc>,
}

/// Enrollment form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub track: String,
    pub experience: String,
    pub motivation: String,
}

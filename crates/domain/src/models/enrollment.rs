//! Course enrollment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Enrollment status. Provisioning only ever creates or reactivates, so
/// ACTIVE is the single state it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "ACTIVE",
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(EnrollmentStatus::Active),
            _ => Err(format!("Invalid enrollment status: {}", s)),
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A student's enrollment in a course for one academic period.
///
/// Unique per (student, course, period); repeat purchases upsert into the
/// same row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub academic_period_id: Uuid,
    /// Assigned on first scheduled purchase, never overwritten afterwards.
    pub teacher_id: Option<Uuid>,
    pub status: EnrollmentStatus,
    pub classes_total: i32,
    pub classes_attended: i32,
    pub classes_missed: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact enrollment reference returned from the capture endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
    pub id: Uuid,
    pub course_title: String,
}

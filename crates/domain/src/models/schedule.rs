//! Weekly schedule and dated booking domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// One weekly slot as selected at checkout: teacher-local wall clock.
///
/// `day_of_week` is 0=Sunday..6=Saturday in the teacher's own time zone;
/// conversion to UTC happens in `services::recurrence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySlot {
    pub teacher_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_day_of_week"))]
    pub day_of_week: i16,

    /// Wall clock `HH:MM`.
    #[validate(custom(function = "shared::validation::validate_wall_clock"))]
    pub start_time: String,

    /// Wall clock `HH:MM`.
    #[validate(custom(function = "shared::validation::validate_wall_clock"))]
    pub end_time: String,
}

/// A weekly slot after conversion to UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtcSlot {
    /// 0=Sunday..6=Saturday, UTC calendar.
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

impl UtcSlot {
    /// Booking label, `HH:MM-HH:MM`.
    pub fn time_slot(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }
}

/// A persisted recurring slot, UTC fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchedule {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

/// Booking status. Generated bookings start out confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete dated class occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBooking {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub enrollment_id: Uuid,
    /// UTC calendar date, `YYYY-MM-DD`.
    pub day: String,
    /// UTC time range, `HH:MM-HH:MM`.
    pub time_slot: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

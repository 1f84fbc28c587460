//! Class booking entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::schedule::{BookingStatus, ClassBooking};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the class_bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct ClassBookingEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub enrollment_id: Uuid,
    pub day: String,
    pub time_slot: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<ClassBookingEntity> for ClassBooking {
    fn from(entity: ClassBookingEntity) -> Self {
        ClassBooking {
            id: entity.id,
            student_id: entity.student_id,
            teacher_id: entity.teacher_id,
            enrollment_id: entity.enrollment_id,
            day: entity.day.trim_end().to_string(),
            time_slot: entity.time_slot.trim_end().to_string(),
            status: entity.status.parse().unwrap_or(BookingStatus::Confirmed),
            created_at: entity.created_at,
        }
    }
}

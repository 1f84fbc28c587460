//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod academic_period;
pub mod class_booking;
pub mod class_schedule;
pub mod coupon;
pub mod course;
pub mod enrollment;
pub mod invoice;
pub mod notification;
pub mod purchase;
pub mod user;

pub use academic_period::AcademicPeriodEntity;
pub use class_booking::ClassBookingEntity;
pub use class_schedule::ClassScheduleEntity;
pub use coupon::CouponEntity;
pub use course::{CourseEntity, PlanEntity};
pub use enrollment::EnrollmentEntity;
pub use invoice::InvoiceEntity;
pub use notification::NotificationEntity;
pub use purchase::PurchaseEntity;
pub use user::UserEntity;

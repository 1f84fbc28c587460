//! Repository implementations for database operations.

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

pub use academic_period::AcademicPeriodRepository;
pub use class_booking::{BookingQuery, ClassBookingInput, ClassBookingRepository};
pub use class_schedule::{ClassScheduleInput, ClassScheduleRepository};
pub use coupon::CouponRepository;
pub use course::CourseRepository;
pub use enrollment::{EnrollmentRepository, EnrollmentUpsertInput};
pub use invoice::{InvoiceInput, InvoiceRepository, PurchaseInput};
pub use notification::{NotificationInput, NotificationRepository};
pub use purchase::PurchaseRepository;
pub use user::UserRepository;

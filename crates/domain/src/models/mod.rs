//! Domain models for LingoClass.

pub mod academic_period;
pub mod course;
pub mod coupon;
pub mod enrollment;
pub mod invoice;
pub mod payment;
pub mod purchase;
pub mod schedule;
pub mod user;

pub use academic_period::AcademicPeriod;
pub use course::{Course, Plan};
pub use coupon::Coupon;
pub use enrollment::{Enrollment, EnrollmentSummary};
pub use invoice::Invoice;
pub use payment::{CaptureOrderRequest, CaptureOrderResponse, CustomerInfo, InvoiceData, PurchaseItem};
pub use purchase::{Purchase, PurchaseStatus, SelectScheduleRequest};
pub use schedule::{ClassBooking, ClassSchedule, UtcSlot, WeeklySlot};
pub use user::{Role, User};

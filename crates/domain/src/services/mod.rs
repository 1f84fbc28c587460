//! Domain services for LingoClass.
//!
//! Services contain business logic that operates on domain models.

pub mod notification;
pub mod payments;
pub mod recurrence;

pub use notification::{
    MockPurchaseNotifier, NotificationResult, PurchaseNotification, PurchaseNotifier,
};

pub use payments::{CaptureOutcome, CaptureStatus, MockGateway, PaymentError, PaymentGateway};

pub use recurrence::{booking_dates, convert_slot_to_utc, format_day, RecurrenceError};

//! HTTP route handlers.

pub mod bookings;
pub mod health;
pub mod invoices;
pub mod payments;
pub mod purchases;
pub mod versioning;

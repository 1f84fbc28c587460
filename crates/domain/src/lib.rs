//! Domain layer for LingoClass backend.
//!
//! This crate contains:
//! - Domain models (users, courses, invoices, purchases, enrollments, schedules)
//! - Business logic services (recurrence, payment gateway, notifications)
//! - Domain error types

pub mod models;
pub mod services;

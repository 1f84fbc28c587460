//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod session;

#[allow(unused_imports)] // Re-exports for downstream use
pub use session::{OptionalSessionUser, SessionUser};

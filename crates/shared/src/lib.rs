//! Shared utilities and common types for the LingoClass backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Reference number generation (invoice numbers)
//! - Common validation logic for wall-clock times and weekly slots
//! - Cursor-based pagination helpers

pub mod pagination;
pub mod reference;
pub mod validation;

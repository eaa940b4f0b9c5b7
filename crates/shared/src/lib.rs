//! Shared types, errors, and configuration for the fiscal calendar.
//!
//! This crate provides common types used across all other crates:
//! - The fiscal calendar error taxonomy
//! - The year-labeling rule token
//! - Settings loading from files and environment

pub mod config;
pub mod error;
pub mod types;

pub use config::CalendarSettings;
pub use error::{FiscalError, FiscalResult};
pub use types::YearLabeling;

//! Fiscal calendar definition, validation and ambient configuration.
//!
//! This module implements:
//! - Range validators for years, months, days and quarters
//! - The validated `FiscalCalendar` value and its overrides
//! - Boundary arithmetic shared by every period type
//! - The thread-local ambient calendar with scoped overrides

pub(crate) mod boundary;
pub mod config;
pub mod scope;
pub mod validation;

pub use config::{CalendarOverrides, FiscalCalendar};
pub use scope::{
    CalendarGuard, active, override_calendar, reset, set_global_config, try_with_calendar,
    with_calendar,
};

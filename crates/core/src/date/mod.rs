//! Calendar moments and their fiscal attributes.
//!
//! [`FiscalMoment`] is implemented by `chrono::NaiveDate`,
//! `chrono::NaiveDateTime` and the two wrappers here, which can pin their
//! own calendar instead of following the ambient one.

pub mod moment;
pub mod wrapper;

pub use moment::FiscalMoment;
pub use wrapper::{FiscalDate, FiscalDateTime};

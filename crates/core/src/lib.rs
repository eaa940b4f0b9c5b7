//! Fiscal calendar arithmetic.
//!
//! Pure calendar logic with no I/O: fiscal years, quarters, months and days
//! under a configurable fiscal calendar, plus resolution of ordinary dates
//! into those periods.
//!
//! # Modules
//!
//! - `calendar` - Calendar configuration, validation and the ambient scope
//! - `period` - Fiscal year, quarter, month and day value types
//! - `date` - Dates and date-times with fiscal attributes
//!
//! ```
//! use fiscal_core::{FiscalDate, FiscalMoment, FiscalYear};
//!
//! let fy = FiscalYear::new(2017).unwrap();
//! assert_eq!(fy.start().to_string(), "2016-10-01 00:00:00");
//!
//! let date = FiscalDate::new(2017, 1, 1).unwrap();
//! assert_eq!(date.fiscal_quarter().unwrap().to_string(), "FY2017 Q2");
//! ```

pub mod calendar;
pub mod date;
pub mod period;

pub use calendar::{CalendarOverrides, FiscalCalendar};
pub use date::{FiscalDate, FiscalDateTime, FiscalMoment};
pub use period::{Contains, FiscalDay, FiscalMonth, FiscalPeriod, FiscalQuarter, FiscalYear};

pub use fiscal_shared::{CalendarSettings, FiscalError, FiscalResult, YearLabeling};

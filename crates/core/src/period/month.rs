//! Fiscal month.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use fiscal_shared::{FiscalError, FiscalResult};

use super::{Contains, FiscalDay, FiscalQuarter, FiscalYear, impl_moment_containment, split_label};
use crate::calendar::boundary::{end_before, fiscal_month_start};
use crate::calendar::validation::{MONTHS_PER_QUARTER, check_month, check_year, parse_int};
use crate::calendar::{FiscalCalendar, scope};
use crate::date::{FiscalDate, FiscalMoment};

/// One of the twelve months of a fiscal year.
///
/// Month 1 is the month the fiscal year starts in, not January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFiscalMonth")]
pub struct FiscalMonth {
    fiscal_year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawFiscalMonth {
    fiscal_year: i32,
    month: u32,
}

impl TryFrom<RawFiscalMonth> for FiscalMonth {
    type Error = FiscalError;

    fn try_from(raw: RawFiscalMonth) -> Result<Self, Self::Error> {
        Self::new(raw.fiscal_year, raw.month)
    }
}

impl FiscalMonth {
    /// Creates a fiscal month.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the year is outside `1..=9999` or the month
    /// outside `1..=12`.
    pub fn new(fiscal_year: i32, month: u32) -> FiscalResult<Self> {
        Ok(Self {
            fiscal_year: check_year(i64::from(fiscal_year))?,
            month: check_month(i64::from(month))?,
        })
    }

    /// Creates a fiscal month from digit-only strings such as `("2016", "2")`.
    pub fn parse(fiscal_year: &str, month: &str) -> FiscalResult<Self> {
        Ok(Self {
            fiscal_year: check_year(parse_int(fiscal_year, "year")?)?,
            month: check_month(parse_int(month, "month")?)?,
        })
    }

    /// The fiscal month containing today's local date under `calendar`.
    pub fn current_in(calendar: &FiscalCalendar) -> FiscalResult<Self> {
        FiscalDate::today().fiscal_month_in(calendar)
    }

    /// The fiscal month containing today's local date.
    pub fn current() -> FiscalResult<Self> {
        Self::current_in(&scope::active())
    }

    pub(crate) const fn from_validated(fiscal_year: i32, month: u32) -> Self {
        Self { fiscal_year, month }
    }

    /// Returns the fiscal year label.
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Returns the fiscal month number, 1 to 12.
    #[must_use]
    pub const fn fiscal_month(&self) -> u32 {
        self.month
    }

    /// The fiscal year this month belongs to.
    #[must_use]
    pub const fn fiscal_year_period(&self) -> FiscalYear {
        FiscalYear::from_validated(self.fiscal_year)
    }

    /// The fiscal quarter this month belongs to.
    #[must_use]
    pub const fn fiscal_quarter_period(&self) -> FiscalQuarter {
        FiscalQuarter::from_validated(self.fiscal_year, (self.month - 1) / MONTHS_PER_QUARTER + 1)
    }

    /// Returns the previous fiscal month, wrapping to month 12 of the previous year.
    pub fn prev_fiscal_month(&self) -> FiscalResult<Self> {
        if self.month == 1 {
            Self::new(self.fiscal_year - 1, 12)
        } else {
            Ok(Self::from_validated(self.fiscal_year, self.month - 1))
        }
    }

    /// Returns the next fiscal month, wrapping to month 1 of the next year.
    pub fn next_fiscal_month(&self) -> FiscalResult<Self> {
        let (fiscal_year, month) = self.successor();
        Self::new(fiscal_year, month)
    }

    /// Start of the fiscal month, with the start day clamped to the
    /// calendar month's length.
    #[must_use]
    pub fn start_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        fiscal_month_start(self.fiscal_year, self.month, calendar)
    }

    /// End of the fiscal month: one second before the next month starts.
    #[must_use]
    pub fn end_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        let (fiscal_year, month) = self.successor();
        end_before(fiscal_month_start(fiscal_year, month, calendar))
    }

    /// Start of the fiscal month under the active calendar.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start_in(&scope::active())
    }

    /// End of the fiscal month under the active calendar.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end_in(&scope::active())
    }

    const fn successor(&self) -> (i32, u32) {
        if self.month == 12 {
            (self.fiscal_year + 1, 1)
        } else {
            (self.fiscal_year, self.month + 1)
        }
    }
}

impl fmt::Display for FiscalMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{} FM{}", self.fiscal_year, self.month)
    }
}

/// Parses labels such as `FY2016 FM1`.
impl FromStr for FiscalMonth {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (fiscal_year, month) = split_label(s, "FM")?;
        Self::parse(fiscal_year, month)
    }
}

impl Contains<FiscalMonth> for FiscalMonth {
    fn contains_in(&self, item: &FiscalMonth, _calendar: &FiscalCalendar) -> bool {
        self == item
    }
}

impl Contains<FiscalDay> for FiscalMonth {
    fn contains_in(&self, item: &FiscalDay, calendar: &FiscalCalendar) -> bool {
        self.start_in(calendar) <= item.start_in(calendar)
            && item.end_in(calendar) <= self.end_in(calendar)
    }
}

impl_moment_containment!(FiscalMonth);

//! Fiscal year.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use fiscal_shared::{FiscalError, FiscalResult};

use super::{Contains, FiscalDay, FiscalMonth, FiscalQuarter, impl_moment_containment};
use crate::calendar::boundary::{
    days_in_fiscal_year, end_before, fiscal_month_start, fiscal_year_is_leap,
};
use crate::calendar::validation::{check_year, parse_int};
use crate::calendar::{FiscalCalendar, scope};
use crate::date::{FiscalDate, FiscalMoment};

/// A single fiscal year, identified by its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFiscalYear")]
pub struct FiscalYear {
    fiscal_year: i32,
}

#[derive(Deserialize)]
struct RawFiscalYear {
    fiscal_year: i32,
}

impl TryFrom<RawFiscalYear> for FiscalYear {
    type Error = FiscalError;

    fn try_from(raw: RawFiscalYear) -> Result<Self, Self::Error> {
        Self::new(raw.fiscal_year)
    }
}

impl FiscalYear {
    /// Creates a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `fiscal_year` is outside `1..=9999`.
    pub fn new(fiscal_year: i32) -> FiscalResult<Self> {
        Ok(Self {
            fiscal_year: check_year(i64::from(fiscal_year))?,
        })
    }

    /// Creates a fiscal year from a digit-only string such as `"2017"`.
    pub fn parse(fiscal_year: &str) -> FiscalResult<Self> {
        let fiscal_year = check_year(parse_int(fiscal_year, "year")?)?;
        Ok(Self { fiscal_year })
    }

    /// The fiscal year containing today's local date under `calendar`.
    pub fn current_in(calendar: &FiscalCalendar) -> FiscalResult<Self> {
        FiscalDate::today().fiscal_year_in(calendar)
    }

    /// The fiscal year containing today's local date.
    pub fn current() -> FiscalResult<Self> {
        Self::current_in(&scope::active())
    }

    /// Built from an already validated year.
    pub(crate) const fn from_validated(fiscal_year: i32) -> Self {
        Self { fiscal_year }
    }

    /// Returns the fiscal year label.
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Returns the previous fiscal year.
    pub fn prev_fiscal_year(&self) -> FiscalResult<Self> {
        Self::new(self.fiscal_year - 1)
    }

    /// Returns the next fiscal year.
    pub fn next_fiscal_year(&self) -> FiscalResult<Self> {
        Self::new(self.fiscal_year + 1)
    }

    /// Start of the fiscal year (start of the first quarter).
    #[must_use]
    pub fn start_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        self.q1().start_in(calendar)
    }

    /// End of the fiscal year (end of the fourth quarter).
    #[must_use]
    pub fn end_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        end_before(fiscal_month_start(self.fiscal_year + 1, 1, calendar))
    }

    /// Start of the fiscal year under the active calendar.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start_in(&scope::active())
    }

    /// End of the fiscal year under the active calendar.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end_in(&scope::active())
    }

    /// Whether the fiscal year contains a February 29th.
    #[must_use]
    pub fn is_leap_in(&self, calendar: &FiscalCalendar) -> bool {
        fiscal_year_is_leap(self.fiscal_year, calendar)
    }

    /// Whether the fiscal year contains a February 29th under the active calendar.
    #[must_use]
    pub fn is_leap(&self) -> bool {
        self.is_leap_in(&scope::active())
    }

    /// Number of days in the fiscal year: 365 or 366.
    #[must_use]
    pub fn days_in_year_in(&self, calendar: &FiscalCalendar) -> u32 {
        days_in_fiscal_year(self.fiscal_year, calendar)
    }

    /// Number of days in the fiscal year under the active calendar.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        self.days_in_year_in(&scope::active())
    }

    /// The first quarter.
    #[must_use]
    pub const fn q1(&self) -> FiscalQuarter {
        FiscalQuarter::from_validated(self.fiscal_year, 1)
    }

    /// The second quarter.
    #[must_use]
    pub const fn q2(&self) -> FiscalQuarter {
        FiscalQuarter::from_validated(self.fiscal_year, 2)
    }

    /// The third quarter.
    #[must_use]
    pub const fn q3(&self) -> FiscalQuarter {
        FiscalQuarter::from_validated(self.fiscal_year, 3)
    }

    /// The fourth quarter.
    #[must_use]
    pub const fn q4(&self) -> FiscalQuarter {
        FiscalQuarter::from_validated(self.fiscal_year, 4)
    }

    /// All four quarters in order.
    #[must_use]
    pub const fn quarters(&self) -> [FiscalQuarter; 4] {
        [self.q1(), self.q2(), self.q3(), self.q4()]
    }

    /// All twelve fiscal months in order.
    #[must_use]
    pub fn months(&self) -> [FiscalMonth; 12] {
        std::array::from_fn(|i| {
            #[allow(clippy::cast_possible_truncation)]
            let month = i as u32 + 1;
            FiscalMonth::from_validated(self.fiscal_year, month)
        })
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{}", self.fiscal_year)
    }
}

/// Parses `FY2017` or a bare `2017`.
impl FromStr for FiscalYear {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.strip_prefix("FY").unwrap_or(s))
    }
}

impl Contains<FiscalYear> for FiscalYear {
    fn contains_in(&self, item: &FiscalYear, _calendar: &FiscalCalendar) -> bool {
        self == item
    }
}

impl Contains<FiscalQuarter> for FiscalYear {
    fn contains_in(&self, item: &FiscalQuarter, _calendar: &FiscalCalendar) -> bool {
        self.fiscal_year == item.fiscal_year()
    }
}

impl Contains<FiscalMonth> for FiscalYear {
    fn contains_in(&self, item: &FiscalMonth, _calendar: &FiscalCalendar) -> bool {
        self.fiscal_year == item.fiscal_year()
    }
}

impl Contains<FiscalDay> for FiscalYear {
    fn contains_in(&self, item: &FiscalDay, _calendar: &FiscalCalendar) -> bool {
        self.fiscal_year == item.fiscal_year()
    }
}

impl_moment_containment!(FiscalYear);

//! Fiscal quarter.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use fiscal_shared::{FiscalError, FiscalResult};

use super::{Contains, FiscalDay, FiscalMonth, FiscalYear, impl_moment_containment, split_label};
use crate::calendar::boundary::{end_before, fiscal_month_start};
use crate::calendar::validation::{
    MONTHS_PER_QUARTER, QUARTERS_PER_YEAR, check_quarter, check_year, parse_int,
};
use crate::calendar::{FiscalCalendar, scope};
use crate::date::{FiscalDate, FiscalMoment};

/// One of the four 3-month quarters of a fiscal year.
///
/// Ordered lexicographically by `(fiscal_year, quarter)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFiscalQuarter")]
pub struct FiscalQuarter {
    fiscal_year: i32,
    quarter: u32,
}

#[derive(Deserialize)]
struct RawFiscalQuarter {
    fiscal_year: i32,
    quarter: u32,
}

impl TryFrom<RawFiscalQuarter> for FiscalQuarter {
    type Error = FiscalError;

    fn try_from(raw: RawFiscalQuarter) -> Result<Self, Self::Error> {
        Self::new(raw.fiscal_year, raw.quarter)
    }
}

impl FiscalQuarter {
    /// Creates a fiscal quarter.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the year is outside `1..=9999` or the quarter
    /// outside `1..=4`.
    pub fn new(fiscal_year: i32, quarter: u32) -> FiscalResult<Self> {
        Ok(Self {
            fiscal_year: check_year(i64::from(fiscal_year))?,
            quarter: check_quarter(i64::from(quarter))?,
        })
    }

    /// Creates a fiscal quarter from digit-only strings such as `("2018", "1")`.
    pub fn parse(fiscal_year: &str, quarter: &str) -> FiscalResult<Self> {
        Ok(Self {
            fiscal_year: check_year(parse_int(fiscal_year, "year")?)?,
            quarter: check_quarter(parse_int(quarter, "quarter")?)?,
        })
    }

    /// The fiscal quarter containing today's local date under `calendar`.
    pub fn current_in(calendar: &FiscalCalendar) -> FiscalResult<Self> {
        FiscalDate::today().fiscal_quarter_in(calendar)
    }

    /// The fiscal quarter containing today's local date.
    pub fn current() -> FiscalResult<Self> {
        Self::current_in(&scope::active())
    }

    pub(crate) const fn from_validated(fiscal_year: i32, quarter: u32) -> Self {
        Self {
            fiscal_year,
            quarter,
        }
    }

    /// Returns the fiscal year label.
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Returns the quarter number, 1 to 4.
    #[must_use]
    pub const fn fiscal_quarter(&self) -> u32 {
        self.quarter
    }

    /// The fiscal year this quarter belongs to.
    #[must_use]
    pub const fn fiscal_year_period(&self) -> FiscalYear {
        FiscalYear::from_validated(self.fiscal_year)
    }

    /// The three fiscal months of this quarter.
    #[must_use]
    pub const fn months(&self) -> [FiscalMonth; 3] {
        let first = self.first_month();
        [
            FiscalMonth::from_validated(self.fiscal_year, first),
            FiscalMonth::from_validated(self.fiscal_year, first + 1),
            FiscalMonth::from_validated(self.fiscal_year, first + 2),
        ]
    }

    /// Returns the previous quarter, wrapping to Q4 of the previous year.
    pub fn prev_fiscal_quarter(&self) -> FiscalResult<Self> {
        if self.quarter == 1 {
            Self::new(self.fiscal_year - 1, QUARTERS_PER_YEAR)
        } else {
            Ok(Self::from_validated(self.fiscal_year, self.quarter - 1))
        }
    }

    /// Returns the next quarter, wrapping to Q1 of the next year.
    pub fn next_fiscal_quarter(&self) -> FiscalResult<Self> {
        let (fiscal_year, quarter) = self.successor();
        Self::new(fiscal_year, quarter)
    }

    /// Start of the quarter.
    ///
    /// The configured start day is clamped to the length of the quarter's
    /// first calendar month, which makes quarter lengths vary for calendars
    /// starting late in the month.
    #[must_use]
    pub fn start_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        fiscal_month_start(self.fiscal_year, self.first_month(), calendar)
    }

    /// End of the quarter: one second before the next quarter starts.
    #[must_use]
    pub fn end_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        let (fiscal_year, quarter) = self.successor();
        end_before(Self::from_validated(fiscal_year, quarter).start_in(calendar))
    }

    /// Start of the quarter under the active calendar.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start_in(&scope::active())
    }

    /// End of the quarter under the active calendar.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end_in(&scope::active())
    }

    const fn first_month(&self) -> u32 {
        (self.quarter - 1) * MONTHS_PER_QUARTER + 1
    }

    // May step one past the supported year range; only used for boundaries.
    const fn successor(&self) -> (i32, u32) {
        if self.quarter == QUARTERS_PER_YEAR {
            (self.fiscal_year + 1, 1)
        } else {
            (self.fiscal_year, self.quarter + 1)
        }
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{} Q{}", self.fiscal_year, self.quarter)
    }
}

/// Parses labels such as `FY2017 Q3`.
impl FromStr for FiscalQuarter {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (fiscal_year, quarter) = split_label(s, "Q")?;
        Self::parse(fiscal_year, quarter)
    }
}

impl Contains<FiscalQuarter> for FiscalQuarter {
    fn contains_in(&self, item: &FiscalQuarter, _calendar: &FiscalCalendar) -> bool {
        self == item
    }
}

impl Contains<FiscalMonth> for FiscalQuarter {
    fn contains_in(&self, item: &FiscalMonth, _calendar: &FiscalCalendar) -> bool {
        self.fiscal_year == item.fiscal_year()
            && item.fiscal_quarter_period().quarter == self.quarter
    }
}

impl Contains<FiscalDay> for FiscalQuarter {
    fn contains_in(&self, item: &FiscalDay, calendar: &FiscalCalendar) -> bool {
        self.start_in(calendar) <= item.start_in(calendar)
            && item.end_in(calendar) <= self.end_in(calendar)
    }
}

impl_moment_containment!(FiscalQuarter);

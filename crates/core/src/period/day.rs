//! Fiscal day.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use fiscal_shared::{FiscalError, FiscalResult};

use super::{Contains, FiscalMonth, FiscalQuarter, FiscalYear, impl_moment_containment, split_label};
use crate::calendar::boundary::{days_in_fiscal_year, end_before, fiscal_month_start};
use crate::calendar::validation::{check_fiscal_day, check_year, parse_int};
use crate::calendar::{FiscalCalendar, scope};
use crate::date::{FiscalDate, FiscalMoment};

/// A single day of a fiscal year, numbered from 1.
///
/// The upper bound is 365 or 366 depending on whether the fiscal year holds
/// a leap day, so validation needs a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFiscalDay")]
pub struct FiscalDay {
    fiscal_year: i32,
    day: u32,
}

#[derive(Deserialize)]
struct RawFiscalDay {
    fiscal_year: i32,
    day: u32,
}

impl TryFrom<RawFiscalDay> for FiscalDay {
    type Error = FiscalError;

    fn try_from(raw: RawFiscalDay) -> Result<Self, Self::Error> {
        Self::new(raw.fiscal_year, raw.day)
    }
}

impl FiscalDay {
    /// Creates a fiscal day validated against `calendar`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the year is outside `1..=9999` or the day is
    /// past the end of that fiscal year.
    pub fn new_in(fiscal_year: i32, day: u32, calendar: &FiscalCalendar) -> FiscalResult<Self> {
        Self::checked(i64::from(fiscal_year), i64::from(day), calendar)
    }

    /// Creates a fiscal day validated against the active calendar.
    pub fn new(fiscal_year: i32, day: u32) -> FiscalResult<Self> {
        Self::new_in(fiscal_year, day, &scope::active())
    }

    /// Creates a fiscal day from digit-only strings such as `("2016", "366")`.
    pub fn parse(fiscal_year: &str, day: &str) -> FiscalResult<Self> {
        let fiscal_year = parse_int(fiscal_year, "year")?;
        let day = parse_int(day, "day")?;
        Self::checked(fiscal_year, day, &scope::active())
    }

    /// The fiscal day containing today's local date under `calendar`.
    pub fn current_in(calendar: &FiscalCalendar) -> FiscalResult<Self> {
        FiscalDate::today().fiscal_day_in(calendar)
    }

    /// The fiscal day containing today's local date.
    pub fn current() -> FiscalResult<Self> {
        Self::current_in(&scope::active())
    }

    pub(crate) const fn from_validated(fiscal_year: i32, day: u32) -> Self {
        Self { fiscal_year, day }
    }

    fn checked(fiscal_year: i64, day: i64, calendar: &FiscalCalendar) -> FiscalResult<Self> {
        let fiscal_year = check_year(fiscal_year)?;
        let day = check_fiscal_day(day, days_in_fiscal_year(fiscal_year, calendar))?;
        Ok(Self { fiscal_year, day })
    }

    /// Returns the fiscal year label.
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Returns the day number within the fiscal year.
    #[must_use]
    pub const fn fiscal_day(&self) -> u32 {
        self.day
    }

    /// The fiscal year this day belongs to.
    #[must_use]
    pub const fn fiscal_year_period(&self) -> FiscalYear {
        FiscalYear::from_validated(self.fiscal_year)
    }

    /// The fiscal month containing this day under `calendar`.
    pub fn fiscal_month_period_in(&self, calendar: &FiscalCalendar) -> FiscalResult<FiscalMonth> {
        self.start_in(calendar).fiscal_month_in(calendar)
    }

    /// The fiscal month containing this day under the active calendar.
    pub fn fiscal_month_period(&self) -> FiscalResult<FiscalMonth> {
        self.fiscal_month_period_in(&scope::active())
    }

    /// The fiscal quarter containing this day under `calendar`.
    pub fn fiscal_quarter_period_in(
        &self,
        calendar: &FiscalCalendar,
    ) -> FiscalResult<FiscalQuarter> {
        Ok(self.fiscal_month_period_in(calendar)?.fiscal_quarter_period())
    }

    /// The fiscal quarter containing this day under the active calendar.
    pub fn fiscal_quarter_period(&self) -> FiscalResult<FiscalQuarter> {
        self.fiscal_quarter_period_in(&scope::active())
    }

    /// Returns the previous day, rolling back to the last day of the
    /// previous fiscal year.
    pub fn prev_fiscal_day_in(&self, calendar: &FiscalCalendar) -> FiscalResult<Self> {
        if self.day > 1 {
            return Ok(Self::from_validated(self.fiscal_year, self.day - 1));
        }
        let fiscal_year = check_year(i64::from(self.fiscal_year) - 1)?;
        Ok(Self::from_validated(
            fiscal_year,
            days_in_fiscal_year(fiscal_year, calendar),
        ))
    }

    /// Returns the previous day under the active calendar.
    pub fn prev_fiscal_day(&self) -> FiscalResult<Self> {
        self.prev_fiscal_day_in(&scope::active())
    }

    /// Returns the next day, rolling over to day 1 of the next fiscal year.
    pub fn next_fiscal_day_in(&self, calendar: &FiscalCalendar) -> FiscalResult<Self> {
        if self.day < days_in_fiscal_year(self.fiscal_year, calendar) {
            return Ok(Self::from_validated(self.fiscal_year, self.day + 1));
        }
        let fiscal_year = check_year(i64::from(self.fiscal_year) + 1)?;
        Ok(Self::from_validated(fiscal_year, 1))
    }

    /// Returns the next day under the active calendar.
    pub fn next_fiscal_day(&self) -> FiscalResult<Self> {
        self.next_fiscal_day_in(&scope::active())
    }

    /// Midnight at the start of the day.
    #[must_use]
    pub fn start_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        let year_start = fiscal_month_start(self.fiscal_year, 1, calendar);
        year_start + TimeDelta::days(i64::from(self.day - 1))
    }

    /// 23:59:59 on the day.
    #[must_use]
    pub fn end_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        end_before(self.start_in(calendar) + TimeDelta::days(1))
    }

    /// Start of the day under the active calendar.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start_in(&scope::active())
    }

    /// End of the day under the active calendar.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end_in(&scope::active())
    }
}

impl fmt::Display for FiscalDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{} FD{}", self.fiscal_year, self.day)
    }
}

/// Parses labels such as `FY2016 FD366`.
impl FromStr for FiscalDay {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (fiscal_year, day) = split_label(s, "FD")?;
        Self::parse(fiscal_year, day)
    }
}

impl Contains<FiscalDay> for FiscalDay {
    fn contains_in(&self, item: &FiscalDay, _calendar: &FiscalCalendar) -> bool {
        self == item
    }
}

impl_moment_containment!(FiscalDay);

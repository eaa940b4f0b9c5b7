//! Calendar dates and date-times that can carry their own fiscal calendar.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use fiscal_shared::{FiscalError, FiscalResult};

use super::FiscalMoment;
use crate::calendar::validation::{
    check_date, check_microsecond, check_time, check_year, parse_int,
};
use crate::calendar::{FiscalCalendar, scope};

fn build_date(year: i64, month: i64, day: i64) -> FiscalResult<NaiveDate> {
    let (year, month, day) = check_date(year, month, day)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| FiscalError::InvalidArgument {
        field: "date",
        value: format!("{year:04}-{month:02}-{day:02}"),
    })
}

fn invalid(field: &'static str, value: &str) -> FiscalError {
    FiscalError::InvalidArgument {
        field,
        value: value.to_string(),
    }
}

/// A calendar date with fiscal attributes.
///
/// Without a pinned calendar the fiscal attributes follow the ambient
/// calendar at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiscalDate {
    date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calendar: Option<FiscalCalendar>,
}

impl FiscalDate {
    /// Creates a date.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the year is outside `1..=9999` or the
    /// month/day do not form a real date.
    pub fn new(year: i32, month: u32, day: u32) -> FiscalResult<Self> {
        let date = build_date(i64::from(year), i64::from(month), i64::from(day))?;
        Ok(Self::from(date))
    }

    /// Creates a date from decimal string components.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a component is not made of digits, and
    /// `OutOfRange` as for [`new`](Self::new).
    pub fn parse_parts(year: &str, month: &str, day: &str) -> FiscalResult<Self> {
        let date = build_date(
            parse_int(year, "year")?,
            parse_int(month, "month")?,
            parse_int(day, "day")?,
        )?;
        Ok(Self::from(date))
    }

    /// Parses an ISO `YYYY-MM-DD` date.
    pub fn parse(value: &str) -> FiscalResult<Self> {
        let date =
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid("date", value))?;
        check_year(i64::from(date.year()))?;
        Ok(Self::from(date))
    }

    /// Today's local date.
    #[must_use]
    pub fn today() -> Self {
        Self::from(Local::now().date_naive())
    }

    /// Pins `calendar` for this value's fiscal attributes.
    #[must_use]
    pub fn with_calendar(mut self, calendar: FiscalCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The pinned calendar, if any.
    #[must_use]
    pub const fn calendar(&self) -> Option<FiscalCalendar> {
        self.calendar
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Day of the calendar month.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

impl From<NaiveDate> for FiscalDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            date,
            calendar: None,
        }
    }
}

impl fmt::Display for FiscalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.date, f)
    }
}

impl FromStr for FiscalDate {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FiscalMoment for FiscalDate {
    fn instant(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    fn within(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.date.within(start, end)
    }

    fn fiscal_calendar(&self) -> FiscalCalendar {
        self.calendar.unwrap_or_else(scope::active)
    }
}

/// A calendar date and wall-clock time with fiscal attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiscalDateTime {
    datetime: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calendar: Option<FiscalCalendar>,
}

impl FiscalDateTime {
    /// Creates a date-time on a whole second.
    ///
    /// Use [`with_microsecond`](Self::with_microsecond) for a fraction of a
    /// second.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> FiscalResult<Self> {
        let date = build_date(i64::from(year), i64::from(month), i64::from(day))?;
        let (hour, minute, second) =
            check_time(i64::from(hour), i64::from(minute), i64::from(second))?;
        let datetime = date
            .and_hms_opt(hour, minute, second)
            .ok_or_else(|| invalid("time", &format!("{hour:02}:{minute:02}:{second:02}")))?;
        Ok(Self::from(datetime))
    }

    /// Replaces the fraction of a second.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` unless `microsecond` is in `0..=999_999`.
    pub fn with_microsecond(mut self, microsecond: u32) -> FiscalResult<Self> {
        let microsecond = check_microsecond(i64::from(microsecond))?;
        self.datetime = self
            .datetime
            .with_nanosecond(microsecond * 1_000)
            .ok_or_else(|| invalid("microsecond", &microsecond.to_string()))?;
        Ok(self)
    }

    /// Parses `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`, with an
    /// optional fraction of a second such as `.250`.
    pub fn parse(value: &str) -> FiscalResult<Self> {
        let datetime = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|_| invalid("datetime", value))?;
        check_year(i64::from(datetime.year()))?;
        Ok(Self::from(datetime))
    }

    /// The current local date-time.
    #[must_use]
    pub fn now() -> Self {
        Self::from(Local::now().naive_local())
    }

    /// Pins `calendar` for this value's fiscal attributes.
    #[must_use]
    pub fn with_calendar(mut self, calendar: FiscalCalendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// The underlying date-time.
    #[must_use]
    pub const fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// The pinned calendar, if any.
    #[must_use]
    pub const fn calendar(&self) -> Option<FiscalCalendar> {
        self.calendar
    }

    /// The date part, keeping the pinned calendar.
    #[must_use]
    pub fn date(&self) -> FiscalDate {
        FiscalDate {
            date: self.datetime.date(),
            calendar: self.calendar,
        }
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.datetime.year()
    }

    /// Calendar month.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.datetime.month()
    }

    /// Day of the calendar month.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.datetime.day()
    }

    /// Hour of the day.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.datetime.hour()
    }

    /// Minute of the hour.
    #[must_use]
    pub fn minute(&self) -> u32 {
        self.datetime.minute()
    }

    /// Second of the minute.
    #[must_use]
    pub fn second(&self) -> u32 {
        self.datetime.second()
    }

    /// Fraction of the second, in microseconds.
    #[must_use]
    pub fn microsecond(&self) -> u32 {
        self.datetime.nanosecond() / 1_000
    }
}

impl From<NaiveDateTime> for FiscalDateTime {
    fn from(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            calendar: None,
        }
    }
}

impl fmt::Display for FiscalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.datetime, f)
    }
}

impl FromStr for FiscalDateTime {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FiscalMoment for FiscalDateTime {
    fn instant(&self) -> NaiveDateTime {
        self.datetime
    }

    fn fiscal_calendar(&self) -> FiscalCalendar {
        self.calendar.unwrap_or_else(scope::active)
    }
}

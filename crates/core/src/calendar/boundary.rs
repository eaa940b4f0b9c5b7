//! Period boundary arithmetic.
//!
//! Every period start reduces to the start of a fiscal month; every period
//! end is one second before the start of its successor.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use fiscal_shared::YearLabeling;

use super::config::FiscalCalendar;
use super::validation::{days_in_month, is_leap_year};

/// Start of fiscal month `fiscal_month` (1-based) of `fiscal_year`.
///
/// The configured start day is clamped to the length of the target calendar
/// month, so a calendar starting on the 31st begins short months on their
/// last day. `fiscal_year` may lie one past the supported range when
/// computing the end of the last supported period.
pub(crate) fn fiscal_month_start(
    fiscal_year: i32,
    fiscal_month: u32,
    calendar: &FiscalCalendar,
) -> NaiveDateTime {
    let start_month = calendar.start_month();
    let month = (start_month - 1 + fiscal_month - 1) % 12 + 1;

    let mut year = calendar.year_labeling().base_calendar_year(fiscal_year);
    if month < start_month {
        year += 1;
    }

    let day = calendar.start_day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
        .expect("fiscal years are bounded well inside chrono's date range")
        .and_time(NaiveTime::MIN)
}

/// Last representable second before `next_start`.
pub(crate) fn end_before(next_start: NaiveDateTime) -> NaiveDateTime {
    next_start - TimeDelta::seconds(1)
}

/// Whether fiscal year `fiscal_year` contains a February 29th.
///
/// A fiscal year starting before March 1st of its first calendar year owns
/// that year's potential leap day; otherwise it owns the following year's.
pub(crate) fn fiscal_year_is_leap(fiscal_year: i32, calendar: &FiscalCalendar) -> bool {
    let start = fiscal_month_start(fiscal_year, 1, calendar);
    let before_march = start.month() < 3;

    let leap_day_year = match (before_march, calendar.year_labeling()) {
        (true, YearLabeling::PreviousCalendarYear) => fiscal_year - 1,
        (false, YearLabeling::PreviousCalendarYear) | (true, YearLabeling::SameCalendarYear) => {
            fiscal_year
        }
        (false, YearLabeling::SameCalendarYear) => fiscal_year + 1,
    };

    is_leap_year(leap_day_year)
}

/// Number of days in fiscal year `fiscal_year`.
pub(crate) fn days_in_fiscal_year(fiscal_year: i32, calendar: &FiscalCalendar) -> u32 {
    if fiscal_year_is_leap(fiscal_year, calendar) {
        366
    } else {
        365
    }
}

//! Range checks for years, months, days, quarters and calendar parameters.
//!
//! Every public constructor funnels its input through these functions, so a
//! value that passes here is valid for the rest of the crate.

use chrono::{Months, NaiveDate};

use fiscal_shared::{FiscalError, FiscalResult, YearLabeling};

/// Smallest supported fiscal year.
pub const MIN_YEAR: i32 = 1;

/// Largest supported fiscal year.
pub const MAX_YEAR: i32 = 9999;

/// Number of quarters in a fiscal year.
pub const QUARTERS_PER_YEAR: u32 = 4;

/// Number of months in each quarter.
pub const MONTHS_PER_QUARTER: u32 = 12 / QUARTERS_PER_YEAR;

/// Month lengths in a non-leap reference year, used to validate calendar
/// start days independently of any particular year.
const REFERENCE_MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Parses a string made only of ASCII decimal digits.
///
/// # Errors
///
/// Returns `InvalidArgument` if `value` is empty or contains anything other
/// than digits (signs and whitespace included), and `OutOfRange` if the
/// number does not fit in an `i64`.
pub fn parse_int(value: &str, field: &'static str) -> FiscalResult<i64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FiscalError::InvalidArgument {
            field,
            value: value.to_string(),
        });
    }

    value
        .parse::<i64>()
        .map_err(|_| FiscalError::out_of_range(field, i64::MAX, 0, i64::MAX))
}

/// Returns true if `year` is a Gregorian leap year.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_yo_opt(year, 366).is_some()
}

/// Number of days in `month` of `year`. `month` must be in `1..=12`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| Some(first.checked_add_months(Months::new(1))? - first))
        .and_then(|span| u32::try_from(span.num_days()).ok())
        .unwrap_or_else(|| reference_days_in_month(month))
}

/// Number of days in `month` of a non-leap reference year.
#[must_use]
pub const fn reference_days_in_month(month: u32) -> u32 {
    REFERENCE_MONTH_LENGTHS[(month - 1) as usize]
}

/// Checks that `year` is a supported fiscal year.
pub fn check_year(year: i64) -> FiscalResult<i32> {
    i32::try_from(year)
        .ok()
        .filter(|year| (MIN_YEAR..=MAX_YEAR).contains(year))
        .ok_or_else(|| {
            FiscalError::out_of_range("year", year, i64::from(MIN_YEAR), i64::from(MAX_YEAR))
        })
}

/// Checks that `month` is in `1..=12`.
pub fn check_month(month: i64) -> FiscalResult<u32> {
    bounded("month", month, 1, 12)
}

/// Checks that `quarter` is in `1..=4`.
pub fn check_quarter(quarter: i64) -> FiscalResult<u32> {
    bounded("quarter", quarter, 1, i64::from(QUARTERS_PER_YEAR))
}

/// Checks that `day` exists in `month` of a non-leap reference year.
pub fn check_day(month: i64, day: i64) -> FiscalResult<u32> {
    let month = check_month(month)?;
    bounded("day", day, 1, i64::from(reference_days_in_month(month)))
}

/// Checks that `year-month-day` is a real calendar date.
pub fn check_date(year: i64, month: i64, day: i64) -> FiscalResult<(i32, u32, u32)> {
    let year = check_year(year)?;
    let month = check_month(month)?;
    let day = bounded("day", day, 1, i64::from(days_in_month(year, month)))?;
    Ok((year, month, day))
}

/// Checks that `hour:minute:second` is a valid wall-clock time.
pub fn check_time(hour: i64, minute: i64, second: i64) -> FiscalResult<(u32, u32, u32)> {
    Ok((
        bounded("hour", hour, 0, 23)?,
        bounded("minute", minute, 0, 59)?,
        bounded("second", second, 0, 59)?,
    ))
}

/// Checks a fraction of a second given in microseconds.
pub fn check_microsecond(microsecond: i64) -> FiscalResult<u32> {
    bounded("microsecond", microsecond, 0, 999_999)
}

/// Checks that `day` is a valid day of a fiscal year with `days_in_year` days.
pub fn check_fiscal_day(day: i64, days_in_year: u32) -> FiscalResult<u32> {
    bounded("fiscal day", day, 1, i64::from(days_in_year))
}

/// Validates the three fiscal calendar parameters.
///
/// `year_labeling` is already a closed enum; unknown tokens are rejected when
/// it is parsed. Month and day failures are reported as `InvalidConfig`.
pub fn validate_calendar(
    year_labeling: YearLabeling,
    start_month: u32,
    start_day: u32,
) -> FiscalResult<()> {
    check_day(i64::from(start_month), i64::from(start_day))
        .map(|_| ())
        .map_err(|err| {
            FiscalError::InvalidConfig(format!(
                "{err} (year_labeling={year_labeling}, start_month={start_month}, \
                 start_day={start_day})"
            ))
        })
}

fn bounded(field: &'static str, value: i64, min: i64, max: i64) -> FiscalResult<u32> {
    if (min..=max).contains(&value) {
        u32::try_from(value).map_err(|_| FiscalError::out_of_range(field, value, min, max))
    } else {
        Err(FiscalError::out_of_range(field, value, min, max))
    }
}

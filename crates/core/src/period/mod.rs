//! Fiscal period value types.
//!
//! Periods are identity values: a `FiscalQuarter` is just `(fiscal_year,
//! quarter)`. Their boundaries are computed from a [`FiscalCalendar`] at
//! call time, so the same period can have different boundaries under
//! different calendars.
//!
//! - `FiscalYear` - a whole fiscal year
//! - `FiscalQuarter` - one of four 3-month quarters
//! - `FiscalMonth` - one of twelve fiscal months
//! - `FiscalDay` - one of 365 or 366 fiscal days
//! - `FiscalPeriod` - any of the above, compared at runtime

pub mod day;
pub mod month;
pub mod quarter;
pub mod year;

#[cfg(test)]
mod period_props;

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use fiscal_shared::{FiscalError, FiscalResult};

use crate::calendar::{FiscalCalendar, scope};

pub use day::FiscalDay;
pub use month::FiscalMonth;
pub use quarter::FiscalQuarter;
pub use year::FiscalYear;

/// Containment of a moment or a finer period within a period.
///
/// Only meaningful pairs implement this trait, so asking whether a quarter
/// contains a year does not compile. Use [`FiscalPeriod::contains_in`] when
/// the comparand type is only known at runtime.
pub trait Contains<T: ?Sized> {
    /// Returns true if `item` lies within `self` under `calendar`.
    fn contains_in(&self, item: &T, calendar: &FiscalCalendar) -> bool;

    /// Returns true if `item` lies within `self` under the active calendar.
    fn contains(&self, item: &T) -> bool {
        self.contains_in(item, &scope::active())
    }
}

/// Implements [`Contains`] for the four moment types on a period that has
/// `start_in` and `end_in`.
macro_rules! impl_moment_containment {
    ($period:ty) => {
        impl_moment_containment!(
            $period;
            chrono::NaiveDate,
            chrono::NaiveDateTime,
            crate::date::FiscalDate,
            crate::date::FiscalDateTime
        );
    };
    ($period:ty; $($moment:ty),+) => {
        $(
            impl crate::period::Contains<$moment> for $period {
                fn contains_in(
                    &self,
                    item: &$moment,
                    calendar: &crate::calendar::FiscalCalendar,
                ) -> bool {
                    crate::date::FiscalMoment::within(
                        item,
                        self.start_in(calendar),
                        self.end_in(calendar),
                    )
                }
            }
        )+
    };
}

pub(crate) use impl_moment_containment;

/// Splits a label such as `FY2017 Q3` into `("2017", "3")` for marker `Q`.
pub(crate) fn split_label<'a>(label: &'a str, marker: &str) -> FiscalResult<(&'a str, &'a str)> {
    let invalid = || FiscalError::InvalidArgument {
        field: "period label",
        value: label.to_string(),
    };

    let rest = label.strip_prefix("FY").ok_or_else(invalid)?;
    let (year, sub) = rest.split_once(' ').ok_or_else(invalid)?;
    let sub = sub.strip_prefix(marker).ok_or_else(invalid)?;
    Ok((year, sub))
}

/// Any fiscal period, for code that handles mixed granularities.
///
/// Ordering and containment between variants are only partially defined:
/// comparing a quarter to a year, or asking whether a day contains a month,
/// fails with `TypeMismatch`.
///
/// `==` is identity: periods of different variants are never equal. Use
/// [`try_eq`](Self::try_eq) to treat a cross-variant comparison as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiscalPeriod {
    /// A fiscal year.
    Year(FiscalYear),
    /// A fiscal quarter.
    Quarter(FiscalQuarter),
    /// A fiscal month.
    Month(FiscalMonth),
    /// A fiscal day.
    Day(FiscalDay),
}

impl FiscalPeriod {
    /// Name of the wrapped period type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Year(_) => "FiscalYear",
            Self::Quarter(_) => "FiscalQuarter",
            Self::Month(_) => "FiscalMonth",
            Self::Day(_) => "FiscalDay",
        }
    }

    /// Fiscal year the period belongs to.
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        match self {
            Self::Year(p) => p.fiscal_year(),
            Self::Quarter(p) => p.fiscal_year(),
            Self::Month(p) => p.fiscal_year(),
            Self::Day(p) => p.fiscal_year(),
        }
    }

    /// Start of the period under `calendar`.
    #[must_use]
    pub fn start_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        match self {
            Self::Year(p) => p.start_in(calendar),
            Self::Quarter(p) => p.start_in(calendar),
            Self::Month(p) => p.start_in(calendar),
            Self::Day(p) => p.start_in(calendar),
        }
    }

    /// End of the period under `calendar`.
    #[must_use]
    pub fn end_in(&self, calendar: &FiscalCalendar) -> NaiveDateTime {
        match self {
            Self::Year(p) => p.end_in(calendar),
            Self::Quarter(p) => p.end_in(calendar),
            Self::Month(p) => p.end_in(calendar),
            Self::Day(p) => p.end_in(calendar),
        }
    }

    /// Start of the period under the active calendar.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start_in(&scope::active())
    }

    /// End of the period under the active calendar.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end_in(&scope::active())
    }

    /// Returns whether `other` lies within `self` under `calendar`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if `other` is a coarser period type than `self`.
    pub fn contains_in(&self, other: &Self, calendar: &FiscalCalendar) -> FiscalResult<bool> {
        let contained = match (self, other) {
            (Self::Year(a), Self::Year(b)) => a.contains_in(b, calendar),
            (Self::Year(a), Self::Quarter(b)) => a.contains_in(b, calendar),
            (Self::Year(a), Self::Month(b)) => a.contains_in(b, calendar),
            (Self::Year(a), Self::Day(b)) => a.contains_in(b, calendar),
            (Self::Quarter(a), Self::Quarter(b)) => a.contains_in(b, calendar),
            (Self::Quarter(a), Self::Month(b)) => a.contains_in(b, calendar),
            (Self::Quarter(a), Self::Day(b)) => a.contains_in(b, calendar),
            (Self::Month(a), Self::Month(b)) => a.contains_in(b, calendar),
            (Self::Month(a), Self::Day(b)) => a.contains_in(b, calendar),
            (Self::Day(a), Self::Day(b)) => a.contains_in(b, calendar),
            _ => return Err(self.mismatch(other)),
        };
        Ok(contained)
    }

    /// Returns whether `other` lies within `self` under the active calendar.
    pub fn contains(&self, other: &Self) -> FiscalResult<bool> {
        self.contains_in(other, &scope::active())
    }

    /// Orders two periods of the same type.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the periods have different types.
    pub fn try_cmp(&self, other: &Self) -> FiscalResult<Ordering> {
        match (self, other) {
            (Self::Year(a), Self::Year(b)) => Ok(a.cmp(b)),
            (Self::Quarter(a), Self::Quarter(b)) => Ok(a.cmp(b)),
            (Self::Month(a), Self::Month(b)) => Ok(a.cmp(b)),
            (Self::Day(a), Self::Day(b)) => Ok(a.cmp(b)),
            _ => Err(self.mismatch(other)),
        }
    }

    /// Compares two periods of the same type for equality.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the periods have different types.
    pub fn try_eq(&self, other: &Self) -> FiscalResult<bool> {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            Ok(self == other)
        } else {
            Err(self.mismatch(other))
        }
    }

    fn mismatch(&self, other: &Self) -> FiscalError {
        FiscalError::TypeMismatch {
            left: self.type_name(),
            right: other.type_name(),
        }
    }
}

impl PartialOrd for FiscalPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(p) => fmt::Display::fmt(p, f),
            Self::Quarter(p) => fmt::Display::fmt(p, f),
            Self::Month(p) => fmt::Display::fmt(p, f),
            Self::Day(p) => fmt::Display::fmt(p, f),
        }
    }
}

impl From<FiscalYear> for FiscalPeriod {
    fn from(period: FiscalYear) -> Self {
        Self::Year(period)
    }
}

impl From<FiscalQuarter> for FiscalPeriod {
    fn from(period: FiscalQuarter) -> Self {
        Self::Quarter(period)
    }
}

impl From<FiscalMonth> for FiscalPeriod {
    fn from(period: FiscalMonth) -> Self {
        Self::Month(period)
    }
}

impl From<FiscalDay> for FiscalPeriod {
    fn from(period: FiscalDay) -> Self {
        Self::Day(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(fy: i32) -> FiscalPeriod {
        FiscalYear::new(fy).unwrap().into()
    }

    fn quarter(fy: i32, q: u32) -> FiscalPeriod {
        FiscalQuarter::new(fy, q).unwrap().into()
    }

    fn day(fy: i32, d: u32) -> FiscalPeriod {
        FiscalDay::new(fy, d).unwrap().into()
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("FY2017 Q3", "Q").unwrap(), ("2017", "3"));
        assert_eq!(split_label("FY2016 FM12", "FM").unwrap(), ("2016", "12"));
        assert!(split_label("2017 Q3", "Q").is_err());
        assert!(split_label("FY2017Q3", "Q").is_err());
        assert!(split_label("FY2016 FM1", "Q").is_err());
    }

    #[test]
    fn test_same_type_ordering() {
        assert_eq!(year(2016).try_cmp(&year(2017)).unwrap(), Ordering::Less);
        assert_eq!(
            quarter(2017, 4).try_cmp(&quarter(2017, 1)).unwrap(),
            Ordering::Greater
        );
        assert!(quarter(2016, 4) < quarter(2017, 1));
    }

    #[test]
    fn test_cross_type_ordering_is_rejected() {
        let err = quarter(2017, 1).try_cmp(&year(2017)).unwrap_err();
        assert_eq!(
            err,
            FiscalError::TypeMismatch {
                left: "FiscalQuarter",
                right: "FiscalYear"
            }
        );
        assert_eq!(quarter(2017, 1).partial_cmp(&year(2017)), None);
        assert_ne!(quarter(2017, 1), year(2017));
    }

    #[test]
    fn test_equality_across_types_is_rejected() {
        assert!(quarter(2017, 1).try_eq(&quarter(2017, 1)).unwrap());
        assert!(!year(2016).try_eq(&year(2017)).unwrap());
        assert_eq!(
            year(2017).try_eq(&quarter(2017, 1)).unwrap_err(),
            FiscalError::TypeMismatch {
                left: "FiscalYear",
                right: "FiscalQuarter"
            }
        );
    }

    #[test]
    fn test_containment_across_types() {
        let calendar = FiscalCalendar::us_federal();
        assert!(year(2017).contains_in(&quarter(2017, 2), &calendar).unwrap());
        assert!(!year(2016).contains_in(&quarter(2017, 2), &calendar).unwrap());
        assert!(quarter(2016, 1).contains_in(&day(2016, 2), &calendar).unwrap());
        assert!(day(2016, 2).contains_in(&day(2016, 2), &calendar).unwrap());
    }

    #[test]
    fn test_containment_of_coarser_period_is_rejected() {
        let calendar = FiscalCalendar::us_federal();
        let err = quarter(2017, 1)
            .contains_in(&year(2017), &calendar)
            .unwrap_err();
        assert_eq!(err.error_code(), "TYPE_MISMATCH");
        assert!(day(2016, 1).contains(&quarter(2016, 1)).is_err());
    }

    #[test]
    fn test_display_and_bounds_delegate() {
        assert_eq!(quarter(2017, 3).to_string(), "FY2017 Q3");
        assert_eq!(year(2016).start(), FiscalYear::new(2016).unwrap().start());
        assert_eq!(year(2016).end(), FiscalYear::new(2016).unwrap().end());
        assert_eq!(day(2016, 1).fiscal_year(), 2016);
        assert_eq!(day(2016, 1).type_name(), "FiscalDay");
    }
}

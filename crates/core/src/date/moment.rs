//! Resolution of calendar moments to the fiscal periods containing them.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::warn;

use fiscal_shared::{FiscalError, FiscalResult};

use crate::calendar::validation::{MAX_YEAR, MIN_YEAR, check_year};
use crate::calendar::{FiscalCalendar, scope};
use crate::period::{FiscalDay, FiscalMonth, FiscalQuarter, FiscalYear};

/// A point in time that can be placed on a fiscal calendar.
///
/// Only [`instant`](Self::instant) is required. Period boundaries are
/// whole seconds, so moments are placed by their whole-second part: a
/// fraction of a second past a period's last second still belongs to it.
/// The `*_in` methods take an
/// explicit calendar; the remaining methods use
/// [`fiscal_calendar`](Self::fiscal_calendar), which is the ambient calendar
/// unless the value pins its own.
pub trait FiscalMoment {
    /// The moment as a naive date-time. Dates map to midnight.
    fn instant(&self) -> NaiveDateTime;

    /// Whether the moment's whole second lies in the closed range `start..=end`.
    fn within(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let instant = whole_seconds(self.instant());
        start <= instant && instant <= end
    }

    /// Calendar used by the ambient forms.
    fn fiscal_calendar(&self) -> FiscalCalendar {
        scope::active()
    }

    /// The fiscal year containing the moment under `calendar`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the moment belongs to a fiscal year outside
    /// `1..=9999`.
    fn fiscal_year_in(&self, calendar: &FiscalCalendar) -> FiscalResult<FiscalYear> {
        let instant = whole_seconds(self.instant());
        let year = instant.year();

        [year, year + 1, year - 1]
            .into_iter()
            .filter_map(|candidate| check_year(i64::from(candidate)).ok())
            .map(FiscalYear::from_validated)
            .find(|fiscal_year| {
                fiscal_year.start_in(calendar) <= instant && instant <= fiscal_year.end_in(calendar)
            })
            .ok_or_else(|| {
                warn!(%instant, ?calendar, "Moment outside supported fiscal years");
                FiscalError::out_of_range(
                    "fiscal year",
                    i64::from(year),
                    i64::from(MIN_YEAR),
                    i64::from(MAX_YEAR),
                )
            })
    }

    /// The fiscal quarter containing the moment under `calendar`.
    fn fiscal_quarter_in(&self, calendar: &FiscalCalendar) -> FiscalResult<FiscalQuarter> {
        let instant = whole_seconds(self.instant());
        let fiscal_year = self.fiscal_year_in(calendar)?;
        fiscal_year
            .quarters()
            .into_iter()
            .find(|q| q.start_in(calendar) <= instant && instant <= q.end_in(calendar))
            .ok_or_else(|| unresolved("quarter", instant))
    }

    /// The fiscal month containing the moment under `calendar`.
    fn fiscal_month_in(&self, calendar: &FiscalCalendar) -> FiscalResult<FiscalMonth> {
        let instant = whole_seconds(self.instant());
        let fiscal_year = self.fiscal_year_in(calendar)?;
        fiscal_year
            .months()
            .into_iter()
            .find(|m| m.start_in(calendar) <= instant && instant <= m.end_in(calendar))
            .ok_or_else(|| unresolved("month", instant))
    }

    /// The fiscal day containing the moment under `calendar`.
    fn fiscal_day_in(&self, calendar: &FiscalCalendar) -> FiscalResult<FiscalDay> {
        let instant = whole_seconds(self.instant());
        let fiscal_year = self.fiscal_year_in(calendar)?;
        let elapsed = (instant - fiscal_year.start_in(calendar)).num_days();
        let day = u32::try_from(elapsed + 1).map_err(|_| unresolved("day", instant))?;
        Ok(FiscalDay::from_validated(fiscal_year.fiscal_year(), day))
    }

    /// The fiscal year containing the moment.
    fn fiscal_year(&self) -> FiscalResult<FiscalYear> {
        self.fiscal_year_in(&self.fiscal_calendar())
    }

    /// The fiscal quarter containing the moment.
    fn fiscal_quarter(&self) -> FiscalResult<FiscalQuarter> {
        self.fiscal_quarter_in(&self.fiscal_calendar())
    }

    /// The fiscal month containing the moment.
    fn fiscal_month(&self) -> FiscalResult<FiscalMonth> {
        self.fiscal_month_in(&self.fiscal_calendar())
    }

    /// The fiscal day containing the moment.
    fn fiscal_day(&self) -> FiscalResult<FiscalDay> {
        self.fiscal_day_in(&self.fiscal_calendar())
    }

    /// The fiscal year before the one containing the moment.
    fn prev_fiscal_year(&self) -> FiscalResult<FiscalYear> {
        self.fiscal_year()?.prev_fiscal_year()
    }

    /// The fiscal year after the one containing the moment.
    fn next_fiscal_year(&self) -> FiscalResult<FiscalYear> {
        self.fiscal_year()?.next_fiscal_year()
    }

    /// The fiscal quarter before the one containing the moment.
    fn prev_fiscal_quarter(&self) -> FiscalResult<FiscalQuarter> {
        self.fiscal_quarter()?.prev_fiscal_quarter()
    }

    /// The fiscal quarter after the one containing the moment.
    fn next_fiscal_quarter(&self) -> FiscalResult<FiscalQuarter> {
        self.fiscal_quarter()?.next_fiscal_quarter()
    }

    /// The fiscal month before the one containing the moment.
    fn prev_fiscal_month(&self) -> FiscalResult<FiscalMonth> {
        self.fiscal_month()?.prev_fiscal_month()
    }

    /// The fiscal month after the one containing the moment.
    fn next_fiscal_month(&self) -> FiscalResult<FiscalMonth> {
        self.fiscal_month()?.next_fiscal_month()
    }

    /// The fiscal day before the one containing the moment.
    fn prev_fiscal_day(&self) -> FiscalResult<FiscalDay> {
        let calendar = self.fiscal_calendar();
        self.fiscal_day_in(&calendar)?.prev_fiscal_day_in(&calendar)
    }

    /// The fiscal day after the one containing the moment.
    fn next_fiscal_day(&self) -> FiscalResult<FiscalDay> {
        let calendar = self.fiscal_calendar();
        self.fiscal_day_in(&calendar)?.next_fiscal_day_in(&calendar)
    }
}

/// Drops any fraction of a second.
fn whole_seconds(instant: NaiveDateTime) -> NaiveDateTime {
    instant.with_nanosecond(0).unwrap_or(instant)
}

fn unresolved(field: &str, instant: NaiveDateTime) -> FiscalError {
    warn!(%instant, field, "Moment not covered by its fiscal year");
    FiscalError::InvalidConfig(format!("no fiscal {field} contains {instant}"))
}

impl FiscalMoment for NaiveDateTime {
    fn instant(&self) -> NaiveDateTime {
        *self
    }
}

impl FiscalMoment for NaiveDate {
    fn instant(&self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }

    /// Compared at date granularity.
    fn within(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start.date() <= *self && *self <= end.date()
    }
}

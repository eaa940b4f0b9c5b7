//! Property-based tests for period boundaries and moment resolution.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;

use fiscal_shared::YearLabeling;

use super::{Contains, FiscalDay, FiscalMonth, FiscalQuarter, FiscalYear};
use crate::calendar::FiscalCalendar;
use crate::calendar::validation::reference_days_in_month;
use crate::date::FiscalMoment;

/// Strategy for any valid fiscal calendar.
fn calendar_strategy() -> impl Strategy<Value = FiscalCalendar> {
    (
        prop_oneof![
            Just(YearLabeling::PreviousCalendarYear),
            Just(YearLabeling::SameCalendarYear)
        ],
        1u32..=12,
    )
        .prop_flat_map(|(labeling, month)| {
            (Just(labeling), Just(month), 1..=reference_days_in_month(month))
        })
        .prop_map(|(labeling, month, day)| {
            FiscalCalendar::new(labeling, month, day).expect("strategy yields valid calendars")
        })
}

/// Strategy for fiscal years away from the edges of the supported range.
fn fiscal_year_strategy() -> impl Strategy<Value = i32> {
    2i32..9998
}

/// Strategy for a moment between 1900 and 2100, including fractions of a
/// second.
fn moment_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..73_000, 0i64..86_400, 0i64..1_000_000_000).prop_map(|(days, seconds, nanos)| {
        NaiveDate::from_ymd_opt(1900, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::days(days)
            + TimeDelta::seconds(seconds)
            + TimeDelta::nanoseconds(nanos)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Stepping a quarter forward and back returns the same quarter.
    #[test]
    fn prop_quarter_navigation_round_trips(fy in fiscal_year_strategy(), q in 1u32..=4) {
        let quarter = FiscalQuarter::new(fy, q).unwrap();
        let next = quarter.next_fiscal_quarter().unwrap();
        let prev = quarter.prev_fiscal_quarter().unwrap();
        prop_assert_eq!(next.prev_fiscal_quarter().unwrap(), quarter);
        prop_assert_eq!(prev.next_fiscal_quarter().unwrap(), quarter);
    }

    /// A year spans exactly its first and last quarter.
    #[test]
    fn prop_year_bounds_match_quarters(cal in calendar_strategy(), fy in fiscal_year_strategy()) {
        let year = FiscalYear::new(fy).unwrap();
        prop_assert_eq!(year.start_in(&cal), year.q1().start_in(&cal));
        prop_assert_eq!(year.end_in(&cal), year.q4().end_in(&cal));
        prop_assert_eq!(
            year.end_in(&cal) + TimeDelta::seconds(1),
            year.next_fiscal_year().unwrap().start_in(&cal)
        );
    }

    /// Consecutive quarters and months leave no gap and do not overlap.
    #[test]
    fn prop_quarters_and_months_partition_year(
        cal in calendar_strategy(),
        fy in fiscal_year_strategy(),
    ) {
        let year = FiscalYear::new(fy).unwrap();
        for pair in year.quarters().windows(2) {
            prop_assert_eq!(pair[0].end_in(&cal) + TimeDelta::seconds(1), pair[1].start_in(&cal));
        }
        for pair in year.months().windows(2) {
            prop_assert_eq!(pair[0].end_in(&cal) + TimeDelta::seconds(1), pair[1].start_in(&cal));
        }
        for quarter in year.quarters() {
            let months = quarter.months();
            prop_assert_eq!(months[0].start_in(&cal), quarter.start_in(&cal));
            prop_assert_eq!(months[2].end_in(&cal), quarter.end_in(&cal));
        }
    }

    /// A moment lies in its resolved year and in exactly one of its quarters.
    #[test]
    fn prop_moment_in_resolved_year_and_one_quarter(
        cal in calendar_strategy(),
        moment in moment_strategy(),
    ) {
        let year = moment.fiscal_year_in(&cal).unwrap();
        prop_assert!(year.contains_in(&moment, &cal));

        let containing = year
            .quarters()
            .iter()
            .filter(|q| q.contains_in(&moment, &cal))
            .count();
        prop_assert_eq!(containing, 1);

        let quarter = moment.fiscal_quarter_in(&cal).unwrap();
        prop_assert!(quarter.contains_in(&moment, &cal));
        prop_assert!(year.contains_in(&quarter, &cal));
    }

    /// Month, day and quarter resolution agree with each other.
    #[test]
    fn prop_month_and_day_resolution_agree(
        cal in calendar_strategy(),
        moment in moment_strategy(),
    ) {
        let month: FiscalMonth = moment.fiscal_month_in(&cal).unwrap();
        let day: FiscalDay = moment.fiscal_day_in(&cal).unwrap();

        prop_assert!(month.contains_in(&moment, &cal));
        prop_assert!(day.contains_in(&moment, &cal));
        prop_assert!(month.contains_in(&day, &cal));
        prop_assert_eq!(day.fiscal_month_period_in(&cal).unwrap(), month);
        prop_assert_eq!(month.fiscal_quarter_period(), moment.fiscal_quarter_in(&cal).unwrap());
        let days_in_year = FiscalYear::new(day.fiscal_year()).unwrap().days_in_year_in(&cal);
        prop_assert!(day.fiscal_day() <= days_in_year);
    }

    /// Day navigation steps exactly one calendar day.
    #[test]
    fn prop_day_navigation_steps_one_day(cal in calendar_strategy(), moment in moment_strategy()) {
        let day = moment.fiscal_day_in(&cal).unwrap();
        let next = day.next_fiscal_day_in(&cal).unwrap();
        prop_assert_eq!(next.start_in(&cal), day.start_in(&cal) + TimeDelta::days(1));
        prop_assert_eq!(next.prev_fiscal_day_in(&cal).unwrap(), day);
    }
}

//! Ambient fiscal calendar and scoped overrides.
//!
//! Every `*_in` computation takes an explicit [`FiscalCalendar`]. The
//! ambient forms (`start()`, `contains()`, `fiscal_year()`, ...) read the
//! calendar returned by [`active`], which lives in thread-local storage so
//! concurrent threads never observe each other's configuration.
//!
//! The ambient state is a stack. Its bottom entry is the thread's base
//! calendar; [`override_calendar`] pushes a new entry and returns a guard
//! that truncates the stack back to its recorded depth when dropped, on
//! every exit path including unwinding.

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

use fiscal_shared::FiscalResult;
use tracing::debug;

use super::config::{CalendarOverrides, FiscalCalendar};

/// One level of the calendar stack.
///
/// `generation` identifies the push that created the entry, so a guard can
/// tell whether the entry at its depth is still its own.
#[derive(Debug, Clone, Copy)]
struct ScopeEntry {
    calendar: FiscalCalendar,
    generation: u64,
}

thread_local! {
    static CALENDAR_STACK: RefCell<Vec<ScopeEntry>> = RefCell::new(vec![ScopeEntry {
        calendar: FiscalCalendar::default(),
        generation: 0,
    }]);
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(1) };
}

/// Returns the calendar currently in effect on this thread.
#[must_use]
pub fn active() -> FiscalCalendar {
    CALENDAR_STACK.with_borrow(|stack| {
        stack
            .last()
            .map(|entry| entry.calendar)
            .unwrap_or_default()
    })
}

/// Number of override scopes currently open on this thread.
#[must_use]
pub fn override_depth() -> usize {
    CALENDAR_STACK.with_borrow(|stack| stack.len().saturating_sub(1))
}

/// Changes the calendar in effect on this thread.
///
/// Omitted fields keep their current value. The merged calendar is
/// validated before anything is replaced: on error the previous calendar
/// stays active. Inside an override scope this replaces the scope's entry,
/// which is discarded when the scope ends.
///
/// # Errors
///
/// Returns `InvalidConfig` if the merged calendar is invalid.
pub fn set_global_config(overrides: CalendarOverrides) -> FiscalResult<FiscalCalendar> {
    let calendar = active().merged(overrides)?;
    install(calendar);
    Ok(calendar)
}

/// Replaces the calendar in effect on this thread with an already validated one.
pub fn install(calendar: FiscalCalendar) {
    let depth = CALENDAR_STACK.with_borrow_mut(|stack| {
        match stack.last_mut() {
            Some(top) => top.calendar = calendar,
            None => stack.push(ScopeEntry {
                calendar,
                generation: 0,
            }),
        }
        stack.len() - 1
    });

    debug!(
        year_labeling = %calendar.year_labeling(),
        start_month = calendar.start_month(),
        start_day = calendar.start_day(),
        depth,
        "Fiscal calendar installed"
    );
}

/// Drops every open override and restores the default calendar.
///
/// Outstanding guards become no-ops.
pub fn reset() {
    CALENDAR_STACK.with_borrow_mut(|stack| {
        stack.clear();
        stack.push(ScopeEntry {
            calendar: FiscalCalendar::default(),
            generation: 0,
        });
    });
    debug!("Fiscal calendar reset to default");
}

/// Temporarily overrides the calendar until the returned guard is dropped.
///
/// Omitted fields are taken from the calendar currently in effect, so
/// nested overrides compose.
///
/// # Errors
///
/// Returns `InvalidConfig` if the merged calendar is invalid; the ambient
/// state is left untouched.
pub fn override_calendar(overrides: CalendarOverrides) -> FiscalResult<CalendarGuard> {
    let calendar = active().merged(overrides)?;
    let generation = NEXT_GENERATION.replace(NEXT_GENERATION.get() + 1);

    let depth = CALENDAR_STACK.with_borrow_mut(|stack| {
        let depth = stack.len();
        stack.push(ScopeEntry {
            calendar,
            generation,
        });
        depth
    });

    debug!(
        year_labeling = %calendar.year_labeling(),
        start_month = calendar.start_month(),
        start_day = calendar.start_day(),
        depth,
        "Fiscal calendar override entered"
    );

    Ok(CalendarGuard {
        depth,
        generation,
        _not_send: PhantomData,
    })
}

/// Runs `body` with the calendar overridden, restoring it afterwards.
///
/// ```
/// use fiscal_core::calendar::{scope, CalendarOverrides};
/// use fiscal_core::FiscalYear;
///
/// let start = scope::with_calendar(CalendarOverrides::new().start_month(4), || {
///     FiscalYear::new(2016).unwrap().start()
/// })
/// .unwrap();
/// assert_eq!(start.to_string(), "2015-04-01 00:00:00");
/// assert_eq!(scope::active().start_month(), 10);
/// ```
pub fn with_calendar<R>(overrides: CalendarOverrides, body: impl FnOnce() -> R) -> FiscalResult<R> {
    let _guard = override_calendar(overrides)?;
    Ok(body())
}

/// Like [`with_calendar`] for bodies that can fail.
pub fn try_with_calendar<R>(
    overrides: CalendarOverrides,
    body: impl FnOnce() -> FiscalResult<R>,
) -> FiscalResult<R> {
    let _guard = override_calendar(overrides)?;
    body()
}

/// Restores the enclosing calendar when dropped.
///
/// Guards are tied to the thread that created them. A guard whose entry was
/// already removed, by an enclosing guard or by [`reset`], does nothing.
#[must_use = "the override ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CalendarGuard {
    depth: usize,
    generation: u64,
    _not_send: PhantomData<*const ()>,
}

impl Drop for CalendarGuard {
    fn drop(&mut self) {
        // The stack may already be gone during thread teardown.
        let restored = CALENDAR_STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            let owned = stack
                .get(self.depth)
                .is_some_and(|entry| entry.generation == self.generation);
            if !owned {
                return None;
            }
            stack.truncate(self.depth);
            stack.last().map(|entry| entry.calendar)
        });

        if let Ok(Some(calendar)) = restored {
            debug!(
                year_labeling = %calendar.year_labeling(),
                start_month = calendar.start_month(),
                start_day = calendar.start_day(),
                depth = self.depth,
                "Fiscal calendar restored"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_shared::{FiscalError, YearLabeling};

    fn snapshot() -> (YearLabeling, u32, u32) {
        let calendar = active();
        (
            calendar.year_labeling(),
            calendar.start_month(),
            calendar.start_day(),
        )
    }

    #[test]
    fn test_default_active_calendar() {
        assert_eq!(active(), FiscalCalendar::us_federal());
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn test_set_global_config_field_by_field() {
        set_global_config(CalendarOverrides::new().year_labeling(YearLabeling::SameCalendarYear))
            .unwrap();
        assert_eq!(active().year_labeling(), YearLabeling::SameCalendarYear);

        set_global_config(CalendarOverrides::new().start_month(4)).unwrap();
        set_global_config(CalendarOverrides::new().start_day(6)).unwrap();
        assert_eq!(active(), FiscalCalendar::uk_personal());

        set_global_config(FiscalCalendar::us_federal().into()).unwrap();
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_set_global_config_is_atomic() {
        let err = set_global_config(CalendarOverrides::new().start_month(2).start_day(29))
            .unwrap_err();
        assert!(matches!(err, FiscalError::InvalidConfig(_)));
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_with_calendar_restores() {
        let inside = with_calendar(CalendarOverrides::new().start_month(4), snapshot).unwrap();
        assert_eq!(inside, (YearLabeling::PreviousCalendarYear, 4, 1));
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_nested_overrides_restore_enclosing_calendar() {
        assert_eq!(snapshot(), (YearLabeling::PreviousCalendarYear, 10, 1));

        with_calendar(
            CalendarOverrides::new().year_labeling(YearLabeling::SameCalendarYear),
            || {
                assert_eq!(snapshot(), (YearLabeling::SameCalendarYear, 10, 1));

                with_calendar(CalendarOverrides::new().start_month(4), || {
                    assert_eq!(snapshot(), (YearLabeling::SameCalendarYear, 4, 1));

                    with_calendar(CalendarOverrides::new().start_day(6), || {
                        assert_eq!(snapshot(), (YearLabeling::SameCalendarYear, 4, 6));
                        assert_eq!(override_depth(), 3);
                    })
                    .unwrap();

                    assert_eq!(snapshot(), (YearLabeling::SameCalendarYear, 4, 1));
                })
                .unwrap();

                assert_eq!(snapshot(), (YearLabeling::SameCalendarYear, 10, 1));
            },
        )
        .unwrap();

        assert_eq!(snapshot(), (YearLabeling::PreviousCalendarYear, 10, 1));
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn test_invalid_override_leaves_state_untouched() {
        let result = with_calendar(CalendarOverrides::new().start_month(0), || ());
        assert!(matches!(result, Err(FiscalError::InvalidConfig(_))));

        let result = with_calendar(CalendarOverrides::new().start_month(2).start_day(29), || ());
        assert!(result.is_err());

        assert_eq!(active(), FiscalCalendar::us_federal());
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn test_restored_after_failing_body() {
        let result: FiscalResult<()> =
            try_with_calendar(CalendarOverrides::new().start_month(4), || {
                Err(FiscalError::InvalidConfig("body failed".into()))
            });
        assert!(result.is_err());
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_restored_after_panic() {
        let outcome = std::panic::catch_unwind(|| {
            with_calendar(CalendarOverrides::new().start_month(4), || {
                panic!("boom");
            })
        });
        assert!(outcome.is_err());
        assert_eq!(active(), FiscalCalendar::us_federal());
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn test_set_inside_scope_is_discarded_on_exit() {
        with_calendar(CalendarOverrides::new().start_month(4), || {
            set_global_config(CalendarOverrides::new().start_day(6)).unwrap();
            assert_eq!(active().start_day(), 6);
        })
        .unwrap();
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_guard_dropped_out_of_order() {
        let outer = override_calendar(CalendarOverrides::new().start_month(4)).unwrap();
        let inner = override_calendar(CalendarOverrides::new().start_month(7)).unwrap();
        drop(outer);
        assert_eq!(active(), FiscalCalendar::us_federal());
        drop(inner);
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_stale_guard_leaves_newer_scope_alone() {
        let outer = override_calendar(CalendarOverrides::new().start_month(4)).unwrap();
        let inner = override_calendar(CalendarOverrides::new().start_month(7)).unwrap();
        drop(outer);

        let replacement = override_calendar(CalendarOverrides::new().start_month(1)).unwrap();
        let nested = override_calendar(CalendarOverrides::new().start_day(15)).unwrap();
        assert_eq!(override_depth(), 2);

        drop(inner);
        assert_eq!(override_depth(), 2);
        assert_eq!(active().start_month(), 1);
        assert_eq!(active().start_day(), 15);

        drop(nested);
        assert_eq!(active().start_day(), 1);
        drop(replacement);
        assert_eq!(active(), FiscalCalendar::us_federal());
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn test_reset_discards_overrides() {
        set_global_config(FiscalCalendar::uk_personal().into()).unwrap();
        let guard = override_calendar(CalendarOverrides::new().start_month(7)).unwrap();
        reset();
        assert_eq!(active(), FiscalCalendar::us_federal());
        assert_eq!(override_depth(), 0);
        drop(guard);
        assert_eq!(active(), FiscalCalendar::us_federal());
    }

    #[test]
    fn test_threads_are_isolated() {
        set_global_config(FiscalCalendar::uk_personal().into()).unwrap();
        let other = std::thread::spawn(active).join().unwrap();
        assert_eq!(other, FiscalCalendar::us_federal());
        assert_eq!(active(), FiscalCalendar::uk_personal());
    }
}

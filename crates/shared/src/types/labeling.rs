//! Year-labeling rule for fiscal years.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FiscalError;

/// Relationship between a fiscal year's label and the calendar year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearLabeling {
    /// The label is the calendar year in which the fiscal year ends
    /// (U.S. federal: FY2016 starts 2015-10-01).
    #[default]
    #[serde(rename = "previous")]
    PreviousCalendarYear,
    /// The label is the calendar year in which the fiscal year starts
    /// (UK personal: FY2016 starts 2016-04-06).
    #[serde(rename = "same")]
    SameCalendarYear,
}

impl YearLabeling {
    /// Returns the configuration token for this rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreviousCalendarYear => "previous",
            Self::SameCalendarYear => "same",
        }
    }

    /// Calendar year in which fiscal year `fiscal_year` starts.
    #[must_use]
    pub const fn base_calendar_year(self, fiscal_year: i32) -> i32 {
        match self {
            Self::PreviousCalendarYear => fiscal_year - 1,
            Self::SameCalendarYear => fiscal_year,
        }
    }
}

impl fmt::Display for YearLabeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearLabeling {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "previous" => Ok(Self::PreviousCalendarYear),
            "same" => Ok(Self::SameCalendarYear),
            other => Err(FiscalError::InvalidConfig(format!(
                "'year_labeling' must be either 'previous' or 'same', not: '{other}'"
            ))),
        }
    }
}

//! Fiscal calendar definition.

use serde::{Deserialize, Serialize};

use fiscal_shared::{CalendarSettings, FiscalError, FiscalResult, YearLabeling};

use super::validation::{parse_int, validate_calendar};

/// A validated fiscal calendar: where the fiscal year starts and how it is labeled.
///
/// Instances only exist after passing [`validate_calendar`], so every
/// boundary computation can rely on `start_month`/`start_day` being valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CalendarSettings", into = "CalendarSettings")]
pub struct FiscalCalendar {
    year_labeling: YearLabeling,
    start_month: u32,
    start_day: u32,
}

impl FiscalCalendar {
    /// Creates a validated fiscal calendar.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `start_month` is not in `1..=12` or
    /// `start_day` does not exist in `start_month` of a non-leap year.
    pub fn new(
        year_labeling: YearLabeling,
        start_month: u32,
        start_day: u32,
    ) -> FiscalResult<Self> {
        validate_calendar(year_labeling, start_month, start_day)?;
        Ok(Self {
            year_labeling,
            start_month,
            start_day,
        })
    }

    /// Creates a fiscal calendar from string inputs.
    ///
    /// `year_labeling` must be `previous` or `same`; month and day must be
    /// digit-only strings.
    pub fn parse(year_labeling: &str, start_month: &str, start_day: &str) -> FiscalResult<Self> {
        let year_labeling = year_labeling.parse()?;
        let start_month = config_component(parse_int(start_month, "start_month")?, "start_month")?;
        let start_day = config_component(parse_int(start_day, "start_day")?, "start_day")?;
        Self::new(year_labeling, start_month, start_day)
    }

    /// The U.S. federal government fiscal year (FY2016 starts 2015-10-01).
    #[must_use]
    pub const fn us_federal() -> Self {
        Self {
            year_labeling: YearLabeling::PreviousCalendarYear,
            start_month: 10,
            start_day: 1,
        }
    }

    /// The UK personal tax year (FY2016 starts 2016-04-06).
    #[must_use]
    pub const fn uk_personal() -> Self {
        Self {
            year_labeling: YearLabeling::SameCalendarYear,
            start_month: 4,
            start_day: 6,
        }
    }

    /// Builds a calendar from loaded settings.
    pub fn from_settings(settings: &CalendarSettings) -> FiscalResult<Self> {
        Self::new(settings.year_labeling, settings.start_month, settings.start_day)
    }

    /// Loads settings from `.env`, config files and `FISCAL__*` variables
    /// and validates them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the settings cannot be read or do not form
    /// a valid calendar.
    pub fn load() -> FiscalResult<Self> {
        let settings =
            CalendarSettings::load().map_err(|err| FiscalError::InvalidConfig(err.to_string()))?;
        Self::from_settings(&settings)
    }

    /// Returns the year-labeling rule.
    #[must_use]
    pub const fn year_labeling(&self) -> YearLabeling {
        self.year_labeling
    }

    /// Returns the first calendar month of the fiscal year.
    #[must_use]
    pub const fn start_month(&self) -> u32 {
        self.start_month
    }

    /// Returns the first day of the first month of the fiscal year.
    #[must_use]
    pub const fn start_day(&self) -> u32 {
        self.start_day
    }

    /// Applies `overrides` on top of this calendar.
    ///
    /// Omitted fields keep their current value. The merged triple is
    /// validated as a whole, so an invalid combination yields an error and
    /// no calendar.
    pub fn merged(&self, overrides: CalendarOverrides) -> FiscalResult<Self> {
        Self::new(
            overrides.year_labeling.unwrap_or(self.year_labeling),
            overrides.start_month.unwrap_or(self.start_month),
            overrides.start_day.unwrap_or(self.start_day),
        )
    }
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self::us_federal()
    }
}

impl TryFrom<CalendarSettings> for FiscalCalendar {
    type Error = FiscalError;

    fn try_from(settings: CalendarSettings) -> Result<Self, Self::Error> {
        Self::from_settings(&settings)
    }
}

impl From<FiscalCalendar> for CalendarSettings {
    fn from(calendar: FiscalCalendar) -> Self {
        Self {
            year_labeling: calendar.year_labeling,
            start_month: calendar.start_month,
            start_day: calendar.start_day,
        }
    }
}

fn config_component(value: i64, field: &'static str) -> FiscalResult<u32> {
    u32::try_from(value)
        .map_err(|_| FiscalError::InvalidConfig(format!("{field} is out of range: {value}")))
}

/// Optional replacements for the fields of a [`FiscalCalendar`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarOverrides {
    /// Replacement year-labeling rule.
    pub year_labeling: Option<YearLabeling>,
    /// Replacement start month.
    pub start_month: Option<u32>,
    /// Replacement start day.
    pub start_day: Option<u32>,
}

impl CalendarOverrides {
    /// Creates an empty set of overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            year_labeling: None,
            start_month: None,
            start_day: None,
        }
    }

    /// Overrides replacing every field with those of `calendar`.
    #[must_use]
    pub const fn all(calendar: FiscalCalendar) -> Self {
        Self {
            year_labeling: Some(calendar.year_labeling),
            start_month: Some(calendar.start_month),
            start_day: Some(calendar.start_day),
        }
    }

    /// Sets the year-labeling rule.
    #[must_use]
    pub const fn year_labeling(mut self, year_labeling: YearLabeling) -> Self {
        self.year_labeling = Some(year_labeling);
        self
    }

    /// Sets the start month.
    #[must_use]
    pub const fn start_month(mut self, start_month: u32) -> Self {
        self.start_month = Some(start_month);
        self
    }

    /// Sets the start day.
    #[must_use]
    pub const fn start_day(mut self, start_day: u32) -> Self {
        self.start_day = Some(start_day);
        self
    }

    /// Sets the year-labeling rule from its token, `previous` or `same`.
    pub fn parse_year_labeling(self, year_labeling: &str) -> FiscalResult<Self> {
        Ok(self.year_labeling(year_labeling.parse()?))
    }

    /// Sets the start month from a digit-only string.
    ///
    /// The value is range checked when the overrides are applied.
    pub fn parse_start_month(self, start_month: &str) -> FiscalResult<Self> {
        let start_month = config_component(parse_int(start_month, "start_month")?, "start_month")?;
        Ok(self.start_month(start_month))
    }

    /// Sets the start day from a digit-only string.
    ///
    /// The value is range checked when the overrides are applied.
    pub fn parse_start_day(self, start_day: &str) -> FiscalResult<Self> {
        let start_day = config_component(parse_int(start_day, "start_day")?, "start_day")?;
        Ok(self.start_day(start_day))
    }
}

impl From<FiscalCalendar> for CalendarOverrides {
    fn from(calendar: FiscalCalendar) -> Self {
        Self::all(calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_us_federal() {
        let calendar = FiscalCalendar::default();
        assert_eq!(calendar.year_labeling(), YearLabeling::PreviousCalendarYear);
        assert_eq!(calendar.start_month(), 10);
        assert_eq!(calendar.start_day(), 1);
        assert_eq!(calendar, FiscalCalendar::us_federal());
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [FiscalCalendar::us_federal(), FiscalCalendar::uk_personal()] {
            let rebuilt = FiscalCalendar::new(
                preset.year_labeling(),
                preset.start_month(),
                preset.start_day(),
            )
            .unwrap();
            assert_eq!(rebuilt, preset);
        }
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let err = FiscalCalendar::new(YearLabeling::SameCalendarYear, 13, 1).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = FiscalCalendar::new(YearLabeling::SameCalendarYear, 2, 29).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_parse_strings() {
        let calendar = FiscalCalendar::parse("same", "4", "6").unwrap();
        assert_eq!(calendar, FiscalCalendar::uk_personal());

        assert_eq!(
            FiscalCalendar::parse("sometimes", "4", "6").unwrap_err().error_code(),
            "INVALID_CONFIG"
        );
        assert_eq!(
            FiscalCalendar::parse("same", "6.5", "6").unwrap_err().error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            FiscalCalendar::parse("same", "4", "hello world").unwrap_err().error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            FiscalCalendar::parse("same", "0", "1").unwrap_err().error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_merged_keeps_omitted_fields() {
        let base = FiscalCalendar::us_federal();
        let merged = base
            .merged(CalendarOverrides::new().year_labeling(YearLabeling::SameCalendarYear))
            .unwrap();
        assert_eq!(merged.year_labeling(), YearLabeling::SameCalendarYear);
        assert_eq!(merged.start_month(), 10);
        assert_eq!(merged.start_day(), 1);

        assert_eq!(base.merged(CalendarOverrides::new()).unwrap(), base);
    }

    #[test]
    fn test_merged_validates_combination() {
        // Day 31 is fine for October but not for April.
        let base = FiscalCalendar::new(YearLabeling::PreviousCalendarYear, 10, 31).unwrap();
        assert!(base.merged(CalendarOverrides::new().start_month(4)).is_err());
        assert!(base.merged(CalendarOverrides::new().start_month(4).start_day(30)).is_ok());
    }

    #[test]
    fn test_overrides_from_strings() {
        let overrides = CalendarOverrides::new()
            .parse_year_labeling("same")
            .and_then(|o| o.parse_start_month("04"))
            .and_then(|o| o.parse_start_day("6"))
            .unwrap();
        assert_eq!(overrides, CalendarOverrides::from(FiscalCalendar::uk_personal()));

        let partial = CalendarOverrides::new().parse_start_month("4").unwrap();
        let merged = FiscalCalendar::us_federal().merged(partial).unwrap();
        assert_eq!(merged.start_month(), 4);
        assert_eq!(merged.start_day(), 1);

        let err = CalendarOverrides::new().parse_start_day("6.5").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        let err = CalendarOverrides::new().parse_year_labeling("sometimes").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        let err = CalendarOverrides::new().parse_start_month("99999999999").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let too_late = CalendarOverrides::new().parse_start_month("13").unwrap();
        assert!(FiscalCalendar::us_federal().merged(too_late).is_err());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = CalendarSettings::from(FiscalCalendar::uk_personal());
        assert_eq!(
            FiscalCalendar::try_from(settings).unwrap(),
            FiscalCalendar::uk_personal()
        );

        let bad = CalendarSettings {
            start_month: 2,
            start_day: 30,
            ..CalendarSettings::default()
        };
        assert!(FiscalCalendar::try_from(bad).is_err());
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("FISCAL__YEAR_LABELING", Some("same")),
                ("FISCAL__START_MONTH", Some("4")),
                ("FISCAL__START_DAY", Some("6")),
            ],
            || assert_eq!(FiscalCalendar::load().unwrap(), FiscalCalendar::uk_personal()),
        );

        temp_env::with_vars(
            [
                ("FISCAL__START_MONTH", Some("2")),
                ("FISCAL__START_DAY", Some("30")),
            ],
            || {
                let err = FiscalCalendar::load().unwrap_err();
                assert_eq!(err.error_code(), "INVALID_CONFIG");
            },
        );
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&FiscalCalendar::uk_personal()).unwrap();
        assert_eq!(json, r#"{"year_labeling":"same","start_month":4,"start_day":6}"#);

        let parsed: FiscalCalendar = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FiscalCalendar::uk_personal());

        let invalid = r#"{"year_labeling":"same","start_month":4,"start_day":31}"#;
        assert!(serde_json::from_str::<FiscalCalendar>(invalid).is_err());
    }
}

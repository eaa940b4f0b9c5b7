//! Fiscal calendar settings loading.

use serde::{Deserialize, Serialize};

use crate::types::YearLabeling;

/// Raw fiscal calendar settings as read from files or the environment.
///
/// Settings are not validated here; `fiscal-core` turns them into a
/// `FiscalCalendar` and rejects invalid combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Year-labeling rule (`previous` or `same`).
    #[serde(default)]
    pub year_labeling: YearLabeling,
    /// First calendar month of the fiscal year.
    #[serde(default = "default_start_month")]
    pub start_month: u32,
    /// First day of the first month of the fiscal year.
    #[serde(default = "default_start_day")]
    pub start_day: u32,
}

fn default_start_month() -> u32 {
    10 // U.S. federal
}

fn default_start_day() -> u32 {
    1
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            year_labeling: YearLabeling::default(),
            start_month: default_start_month(),
            start_day: default_start_day(),
        }
    }
}

impl CalendarSettings {
    /// Loads settings from `.env`, config files and `FISCAL__*` variables.
    ///
    /// Later sources override earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then the environment
    /// (e.g. `FISCAL__START_MONTH=4`).
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong shape.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FISCAL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

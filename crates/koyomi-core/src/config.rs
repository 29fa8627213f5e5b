use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{DEFAULT_MAX_WINDOW_DAYS, MAX_RECURRENCE_INSTANCES};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub expansion: ExpansionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Limits applied by the recurrence calculator.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// Hard cap on enumerated occurrences per expansion.
    pub max_instances: usize,
    /// Maximum width of a query window, in days.
    pub max_window_days: i64,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_instances: MAX_RECURRENCE_INSTANCES,
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
        }
    }
}

impl ExpansionConfig {
    /// ## Summary
    /// Checks that the configured limits are usable.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` if either limit is zero or negative.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_instances == 0 {
            return Err(CoreError::InvalidInput(
                "expansion.max_instances must be at least 1".to_string(),
            ));
        }
        if self.max_window_days < 1 {
            return Err(CoreError::InvalidInput(
                "expansion.max_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails,
    /// or if the expansion limits are unusable.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "debug")?
            .set_default(
                "expansion.max_instances",
                u64::try_from(MAX_RECURRENCE_INSTANCES).unwrap_or(u64::MAX),
            )?
            .set_default("expansion.max_window_days", DEFAULT_MAX_WINDOW_DAYS)?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Self>()?;

        settings.expansion.validate()?;
        tracing::debug!(level = %settings.logging.level, "Loaded settings");
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::Result;
use crate::models::DailyField;
use crate::utils::constants::{
    DEFAULT_DAILY_FILE, DEFAULT_DATE_FORMAT, DEFAULT_HOURLY_FILE, ENV_PREFIX,
};

/// Session configuration, layered as defaults, optional config file,
/// `BIKESHARE_*` environment variables, then CLI overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyticsConfig {
    pub daily_source: PathBuf,

    pub hourly_source: PathBuf,

    #[validate(length(min = 1))]
    pub date_format: String,

    #[validate(length(min = 1))]
    pub correlation_fields: Vec<DailyField>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            daily_source: PathBuf::from(DEFAULT_DAILY_FILE),
            hourly_source: PathBuf::from(DEFAULT_HOURLY_FILE),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            correlation_fields: DailyField::WEATHER_FACTORS.to_vec(),
        }
    }
}

impl AnalyticsConfig {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let default_fields: Vec<String> = defaults
            .correlation_fields
            .iter()
            .map(|f| f.as_str().to_string())
            .collect();

        let mut builder = config::Config::builder()
            .set_default(
                "daily_source",
                defaults.daily_source.to_string_lossy().to_string(),
            )?
            .set_default(
                "hourly_source",
                defaults.hourly_source.to_string_lossy().to_string(),
            )?
            .set_default("date_format", defaults.date_format.clone())?
            .set_default("correlation_fields", default_fields)?;

        if let Some(path) = config_file {
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("correlation_fields"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_daily_source(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.daily_source = path;
        }
        self
    }

    pub fn with_hourly_source(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.hourly_source = path;
        }
        self
    }
}

//! Global holisync configuration.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_END_YEAR, DEFAULT_MAX_RESULTS, DEFAULT_OUTPUT_PATH, DEFAULT_START_YEAR,
};
use crate::error::{HolisyncError, HolisyncResult};
use crate::holiday::HolidaySpec;
use crate::sync::CleanupPolicy;

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_start_year() -> i32 {
    DEFAULT_START_YEAR
}

fn default_end_year() -> i32 {
    DEFAULT_END_YEAR
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

/// Configuration at ~/.config/holisync/config.toml
///
/// Every key can be overridden with a `HOLISYNC_` environment variable,
/// e.g. `HOLISYNC_CALENDAR_ID=work@example.com`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HolisyncConfig {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// Account whose stored Google tokens are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_account: Option<String>,

    /// IANA name of the timezone given to floating imported times.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_start_year")]
    pub start_year: i32,

    #[serde(default = "default_end_year")]
    pub end_year: i32,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub cleanup_policy: CleanupPolicy,

    #[serde(default = "HolidaySpec::defaults")]
    pub holidays: Vec<HolidaySpec>,
}

impl Default for HolisyncConfig {
    fn default() -> Self {
        HolisyncConfig {
            calendar_id: default_calendar_id(),
            google_account: None,
            timezone: None,
            start_year: default_start_year(),
            end_year: default_end_year(),
            max_results: default_max_results(),
            output: default_output(),
            cleanup_policy: CleanupPolicy::default(),
            holidays: HolidaySpec::defaults(),
        }
    }
}

impl HolisyncConfig {
    pub fn config_dir() -> HolisyncResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| HolisyncError::Config("Could not determine config directory".into()))?
            .join("holisync"))
    }

    pub fn config_path() -> HolisyncResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file (creating a commented default one if missing),
    /// then apply environment overrides.
    pub fn load() -> HolisyncResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::build(
            Config::builder()
                .add_source(File::from(config_path).required(false))
                .add_source(Environment::with_prefix("HOLISYNC").try_parsing(true)),
        )
    }

    /// Parse a config from TOML text, without environment overrides.
    pub fn from_toml_str(contents: &str) -> HolisyncResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> HolisyncResult<Self> {
        let config: HolisyncConfig = builder
            .build()
            .map_err(|e| HolisyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HolisyncError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> HolisyncResult<()> {
        if self.start_year > self.end_year {
            return Err(HolisyncError::Config(format!(
                "start_year {} is after end_year {}",
                self.start_year, self.end_year
            )));
        }
        if self.max_results == 0 {
            return Err(HolisyncError::Config("max_results must be positive".into()));
        }
        if let Some(spec) = self.holidays.iter().find(|h| h.occurrence <= 0 || !(1..=12).contains(&h.month)) {
            return Err(HolisyncError::Config(format!(
                "holiday '{}' needs a month in 1..=12 and a positive occurrence",
                spec.title
            )));
        }
        Ok(())
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Output path with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output.to_string_lossy()).into_owned())
    }

    pub fn holiday_titles(&self) -> Vec<String> {
        self.holidays.iter().map(|h| h.title.clone()).collect()
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HolisyncResult<()> {
        let contents = format!(
            "\
# holisync configuration

# Calendar to sync into:
# calendar_id = \"{}\"

# Account whose stored Google tokens to use:
# google_account = \"me@example.com\"

# Timezone for imported times that carry none (defaults to the system zone):
# timezone = \"Europe/Berlin\"

# Years to generate and sync holidays for:
# start_year = {}
# end_year = {}

# Events fetched per listing request:
# max_results = {}

# Where `holisync generate` writes its file:
# output = \"{}\"

# marker-mismatch also deletes untagged events with a holiday title,
# foreign-marker-only leaves them alone:
# cleanup_policy = \"marker-mismatch\"

# Holidays as the n-th weekday of a month:
# [[holidays]]
# title = \"Mother's Day\"
# month = 5
# weekday = \"Sun\"
# occurrence = 2
",
            DEFAULT_CALENDAR_ID, DEFAULT_START_YEAR, DEFAULT_END_YEAR, DEFAULT_MAX_RESULTS, DEFAULT_OUTPUT_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| HolisyncError::Config(format!("Could not create config directory: {e}")))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HolisyncError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

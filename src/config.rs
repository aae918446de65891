use dotenv::dotenv;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 2;
pub const DEFAULT_RESULTS_PATH: &str = "calendar_test_results.json";
pub const DEFAULT_SHEET_PATH: &str =
    "attached_assets/Client names for testing Google Calendar_1749265665332.xlsx";
pub const DEFAULT_SHEET_OUTPUT_PATH: &str = "test_calendar_data.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be a whole number of seconds, got '{1}'")]
    InvalidDelay(&'static str, String),

    #[error("{0} is not a valid log level: '{1}'")]
    InvalidLogLevel(&'static str, String),
}

/// Runtime settings for both tools.
///
/// Every field has a hard-coded default; the environment (and a `.env`
/// file, when present) can override it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub settle_delay: Duration,
    pub results_path: PathBuf,
    pub scenarios_path: Option<PathBuf>,
    pub sheet_path: PathBuf,
    pub sheet_output_path: PathBuf,
    pub log_level: log::LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_DELAY_SECS),
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            scenarios_path: None,
            sheet_path: PathBuf::from(DEFAULT_SHEET_PATH),
            sheet_output_path: PathBuf::from(DEFAULT_SHEET_OUTPUT_PATH),
            log_level: log::LevelFilter::Info,
            log_file: None,
        }
    }
}

impl Settings {
    /// Loads `.env` (if any) and reads overrides from the process environment.
    pub fn from_env() -> Result<Settings, ConfigError> {
        dotenv().ok();
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(url) = get("API_BASE_URL") {
            settings.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(delay) = get("SETTLE_DELAY_SECS") {
            let secs = delay
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDelay("SETTLE_DELAY_SECS", delay.clone()))?;
            settings.settle_delay = Duration::from_secs(secs);
        }
        if let Some(path) = get("RESULTS_PATH") {
            settings.results_path = PathBuf::from(path);
        }
        settings.scenarios_path = get("SCENARIOS_PATH").map(PathBuf::from);
        if let Some(path) = get("SHEET_PATH") {
            settings.sheet_path = PathBuf::from(path);
        }
        if let Some(path) = get("SHEET_OUTPUT_PATH") {
            settings.sheet_output_path = PathBuf::from(path);
        }
        if let Some(level) = get("LOG_LEVEL") {
            settings.log_level = level
                .trim()
                .parse::<log::LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel("LOG_LEVEL", level.clone()))?;
        }
        settings.log_file = get("LOG_FILE").map(PathBuf::from);

        Ok(settings)
    }
}

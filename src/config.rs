//! Service configuration.
//!
//! Loaded from an optional TOML file (default `agency_hours.toml`, or the
//! path in `AGENCY_HOURS_CONFIG`). `AGENCY_API_URL` overrides the feed URL.
//! Both variables may come from a `.env` file. Every field has a default, so
//! running without any configuration targets the public directory.

use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::clock::DEFAULT_TIMEZONE;
use crate::ingest::arcgis::DEFAULT_FEED_URL;
use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "agency_hours.toml";
pub const CONFIG_PATH_VAR: &str = "AGENCY_HOURS_CONFIG";
pub const API_URL_VAR: &str = "AGENCY_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feature service query URL returning GeoJSON.
    pub api_url: String,
    /// IANA zone every evaluation is made in.
    pub timezone: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_FEED_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.name().to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            log_file: None,
            console_timestamps: false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    InvalidTimezone(String),
    InvalidLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::InvalidTimezone(name) => write!(f, "Unknown timezone: {}", name),
            ConfigError::InvalidLogLevel(msg) => write!(f, "Invalid log level: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parses TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path` if it exists; otherwise returns defaults.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Config::from_toml(&text)
    }

    /// Full resolution: `.env`, config file, then environment overrides.
    pub fn load() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Config::from_file(Path::new(&path))?;

        if let Ok(url) = std::env::var(API_URL_VAR) {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.zone()?;
        self.level()?;
        Ok(())
    }

    pub fn zone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level.parse().map_err(ConfigError::InvalidLogLevel)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

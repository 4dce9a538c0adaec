use match_history::config::{Config as HistoryConfig, ValidationError};
use serde::Deserialize;
use std::fs::File;

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV: &str = "RIOT_API_KEY";

#[derive(Deserialize, Debug, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    #[serde(default = "default_statsd_port")]
    pub statsd_port: u16,
}

fn default_statsd_port() -> u16 {
    8125
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub sentry_dsn: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".into(),
            sentry_dsn: None,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(flatten)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub metrics: Option<MetricsConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Reads, completes and validates the config at `path`.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.fill_api_key(std::env::var(API_KEY_ENV).ok());
        config.history.validate()?;

        Ok(config)
    }

    fn fill_api_key(&mut self, fallback: Option<String>) {
        let api_key = &mut self.history.riot.api_key;
        if api_key.is_none() {
            *api_key = fallback.filter(|key| !key.is_empty());
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

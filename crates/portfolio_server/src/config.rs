//! Environment-driven server configuration.
//!
//! Values come from process environment variables, after an optional `.env`
//! file has been loaded. Every key falls back to a default except where
//! noted.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use portfolio_core::default_log_level;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "portfolio.sqlite3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<String>,
    /// Single allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host: read("PORTFOLIO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", read("PORT"), DEFAULT_PORT)?,
            db_path: read("PORTFOLIO_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_level: read("PORTFOLIO_LOG_LEVEL")
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read("PORTFOLIO_LOG_DIR"),
            cors_origin: read("PORTFOLIO_CORS_ORIGIN"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(err) => Err(ConfigError::Invalid {
                key,
                reason: err.to_string(),
                value,
            }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.db_path, PathBuf::from("portfolio.sqlite3"));
        assert!(config.log_dir.is_none());
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "9090"),
            ("PORTFOLIO_HOST", "127.0.0.1"),
            ("PORTFOLIO_DB_PATH", "/var/lib/portfolio.db"),
            ("PORTFOLIO_LOG_LEVEL", "warn"),
            ("PORTFOLIO_CORS_ORIGIN", "https://example.com"),
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/portfolio.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.cors_origin.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "  "), ("PORTFOLIO_LOG_DIR", "")]).unwrap();
        assert_eq!(config.port, 8000);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}

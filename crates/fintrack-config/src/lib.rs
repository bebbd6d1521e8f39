//! Configuration management for fintrack
//!
//! Loads and validates the client configuration from a YAML file. Every
//! field has a default, so an empty file (or no file at all) is a valid
//! configuration that talks to a service on `localhost:8000`.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, ConfigErrorCode, ConfigErrorDetails, ConfigErrorSeverity, ConfigResult};

// ==================== Configuration Types ====================

/// Remote persistence service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the transactions service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Year selector window around the current year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_year_span")]
    pub years_before: u32,
    #[serde(default = "default_year_span")]
    pub years_after: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            years_before: default_year_span(),
            years_after: default_year_span(),
        }
    }
}

fn default_year_span() -> u32 {
    3
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol printed next to amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

fn default_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

impl Default for SymbolPosition {
    fn default() -> Self {
        SymbolPosition::Before
    }
}

impl std::str::FromStr for SymbolPosition {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "before" => Ok(SymbolPosition::Before),
            "after" => Ok(SymbolPosition::After),
            _ => Err(format!("Invalid symbol position: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
const MAX_YEAR_SPAN: u32 = 50;
const MAX_DECIMAL_PLACES: u32 = 10;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Read, parse and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            let path = path.display().to_string();
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound { path }
            } else {
                ConfigError::Unreadable { path, source }
            }
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        // serde_yaml rejects an empty document, treat it as "all defaults"
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?
        };

        config.validate()?;

        Ok(config)
    }

    /// Check value ranges; the first offending field is reported
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &str, reason: impl Into<String>) -> ConfigResult<()> {
            Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: reason.into(),
            })
        }

        if self.service.base_url.trim().is_empty() {
            return invalid("service.base_url", "must not be empty");
        }
        if self.service.timeout_secs == 0 {
            return invalid("service.timeout_secs", "must be greater than 0");
        }
        if self.filter.years_before > MAX_YEAR_SPAN {
            return invalid("filter.years_before", format!("must be at most {}", MAX_YEAR_SPAN));
        }
        if self.filter.years_after > MAX_YEAR_SPAN {
            return invalid("filter.years_after", format!("must be at most {}", MAX_YEAR_SPAN));
        }
        if self.currency.decimal_places > MAX_DECIMAL_PLACES {
            return invalid(
                "currency.decimal_places",
                format!("must be between 0 and {}", MAX_DECIMAL_PLACES),
            );
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return invalid("logging.level", format!("must be one of: {}", LOG_LEVELS.join(", ")));
        }

        Ok(())
    }

    /// Contents of a commented configuration file with every default
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        PathBuf::from("fintrack.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.timeout(), Duration::from_secs(10));
        assert_eq!(config.filter.years_before, 3);
        assert_eq!(config.filter.years_after, 3);
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.currency.symbol_position, SymbolPosition::Before);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let yaml = "service:\n  base_url: \"https://finance.example.com\"\ncurrency:\n  symbol: \"EUR\"\n  symbol_position: after\n";
        let config = Config::from_yaml_str(yaml).unwrap();

        assert_eq!(config.service.base_url, "https://finance.example.com");
        assert_eq!(config.service.timeout_secs, 10);
        assert_eq!(config.currency.symbol, "EUR");
        assert_eq!(config.currency.symbol_position, SymbolPosition::After);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_generated_default_is_valid() {
        let config = Config::from_yaml_str(Config::generate_default()).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_yaml_str("service:\n  timeout_secs: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "service.timeout_secs"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let err = Config::from_yaml_str("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = Config::from_yaml_str("service: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/fintrack.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_year_window_limit() {
        let err = Config::from_yaml_str("filter:\n  years_after: 51\n").unwrap_err();
        assert_eq!(err.field(), Some("filter.years_after"));
        assert!(Config::from_yaml_str("filter:\n  years_before: 50\n").is_ok());
    }

    #[test]
    fn test_symbol_position_from_str() {
        assert_eq!("before".parse::<SymbolPosition>().unwrap(), SymbolPosition::Before);
        assert_eq!("AFTER".parse::<SymbolPosition>().unwrap(), SymbolPosition::After);
        assert!("middle".parse::<SymbolPosition>().is_err());
    }
}

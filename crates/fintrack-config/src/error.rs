//! Error types for fintrack-config

use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    NotFound,
    Unreadable,
    InvalidYaml,
    InvalidValue,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorCode::NotFound => write!(f, "CONFIG_NOT_FOUND"),
            ConfigErrorCode::Unreadable => write!(f, "CONFIG_UNREADABLE"),
            ConfigErrorCode::InvalidYaml => write!(f, "CONFIG_INVALID_YAML"),
            ConfigErrorCode::InvalidValue => write!(f, "CONFIG_INVALID_VALUE"),
        }
    }
}

/// `Warning` lets the program run on defaults; `Fatal` stops it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorSeverity {
    Warning,
    Fatal,
}

impl std::fmt::Display for ConfigErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorSeverity::Warning => write!(f, "warning"),
            ConfigErrorSeverity::Fatal => write!(f, "fatal"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Not fatal for callers that fall back to defaults
    #[error("Configuration file {path} does not exist")]
    FileNotFound { path: String },

    #[error("Could not read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration is not valid YAML: {message}")]
    InvalidYaml { message: String },

    #[error("Bad value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::NotFound,
            ConfigError::Unreadable { .. } => ConfigErrorCode::Unreadable,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
        }
    }

    pub fn severity(&self) -> ConfigErrorSeverity {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorSeverity::Warning,
            _ => ConfigErrorSeverity::Fatal,
        }
    }

    /// Whether the program should stop instead of running on defaults
    pub fn is_fatal(&self) -> bool {
        self.severity() == ConfigErrorSeverity::Fatal
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }

    fn hints(&self) -> Vec<&'static str> {
        match self {
            ConfigError::FileNotFound { .. } => vec![
                "pass --config to point at another file",
                "run `fintrack init-config` to write one with the defaults",
            ],
            ConfigError::Unreadable { .. } => vec!["check the file permissions"],
            ConfigError::InvalidYaml { .. } | ConfigError::InvalidValue { .. } => {
                vec!["compare with the file written by `fintrack init-config`"]
            }
        }
    }

    /// Printable report: code, message, field and hints
    pub fn to_details(&self) -> ConfigErrorDetails {
        ConfigErrorDetails {
            code: self.code(),
            severity: self.severity(),
            message: self.to_string(),
            field: self.field().map(str::to_string),
            hints: self.hints(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub severity: ConfigErrorSeverity,
    pub message: String,
    pub field: Option<String>,
    pub hints: Vec<&'static str>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, "\n  field: {}", field)?;
        }
        for hint in &self.hints {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

//! Error types for fintrack-core
//!
//! Three kinds of failure reach the user: a draft rejected locally before
//! any request, a request that never completed, and a request the service
//! rejected. None of them are fatal; each carries a code, a severity and
//! suggestions so presentation layers can render a notice.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{Period, PeriodError};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Draft rejected before submission
    ValidationError,
    /// Request could not be completed
    NetworkError,
    /// Service answered with a failure
    ServiceError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::NetworkError => write!(f, "NETWORK_ERROR"),
            ErrorCode::ServiceError => write!(f, "SERVICE_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - user input needs attention
    Warning,
    /// Error - operation failed, state kept as before
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for presentation layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Local rejection of a draft
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Amount is not a number: '{input}'")]
    InvalidAmount { input: String },

    #[error("Amount must not be negative: {amount}")]
    NegativeAmount { amount: String },

    #[error("Date is required")]
    MissingDate,

    #[error("Invalid month: {month} (expected 1-12)")]
    InvalidMonth { month: u32 },
}

impl From<PeriodError> for ValidationError {
    fn from(error: PeriodError) -> Self {
        match error {
            PeriodError::InvalidMonth { month } => ValidationError::InvalidMonth { month },
        }
    }
}

impl ValidationError {
    /// Draft field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyDescription => "description",
            ValidationError::InvalidAmount { .. } | ValidationError::NegativeAmount { .. } => "amount",
            ValidationError::MissingDate => "date",
            ValidationError::InvalidMonth { .. } => "month",
        }
    }
}

/// Failure reported by a `FinanceService` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Connectivity problem or timeout
    #[error("{message}")]
    Network { message: String },

    /// Service answered but rejected the request, or the body was unusable
    #[error("{message}")]
    Service { status: Option<u16>, message: String },
}

/// Main error type for engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Service error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Service { status: Option<u16>, message: String },
}

impl From<RemoteError> for SyncError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Network { message } => SyncError::Network { message },
            RemoteError::Service { status, message } => SyncError::Service { status, message },
        }
    }
}

impl SyncError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::Validation(_) => ErrorCode::ValidationError,
            SyncError::Network { .. } => ErrorCode::NetworkError,
            SyncError::Service { .. } => ErrorCode::ServiceError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SyncError::Validation(_) => ErrorSeverity::Warning,
            SyncError::Network { .. } | SyncError::Service { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            SyncError::Validation(reason) => {
                details = details.with_detail(serde_json::json!({ "field": reason.field() }));
                details = details.with_suggestion(
                    "Correct the highlighted field and submit again.".to_string()
                );
            }
            SyncError::Network { .. } => {
                details = details.with_suggestion(
                    "Check that the finance service is running and reachable.".to_string()
                );
                details = details.with_suggestion(
                    "Retry the operation; nothing was changed locally.".to_string()
                );
            }
            SyncError::Service { status, .. } => {
                if let Some(status) = status {
                    details = details.with_detail(serde_json::json!({ "status": status }));
                }
                if *status == Some(404) {
                    details = details.with_suggestion(
                        "The transaction may already have been removed; refresh the list.".to_string()
                    );
                } else {
                    details = details.with_suggestion(
                        "Retry the operation; the previous data is still shown.".to_string()
                    );
                }
            }
        }

        details
    }
}

/// Result type with SyncError
pub type SyncResult<T> = Result<T, SyncError>;

/// Context attached to a logged failure
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Filter active when the operation ran
    pub period: Option<Period>,
    /// Refresh ticket, when the operation was a refresh
    pub ticket: Option<u64>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            period: None,
            ticket: None,
        }
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_ticket(mut self, ticket: u64) -> Self {
        self.ticket = Some(ticket);
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &SyncError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &SyncError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "fintrack::error",
                "[{}] {} - Operation: {} - Period: {:?}",
                error.code(),
                error,
                context.operation,
                context.period.map(|p| p.to_string())
            ),
            ErrorSeverity::Error => log::error!(
                target: "fintrack::error",
                "[{}] {} - Operation: {} - Period: {:?} - Ticket: {:?}",
                error.code(),
                error,
                context.operation,
                context.period.map(|p| p.to_string()),
                context.ticket
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "fintrack::error",
            "WARNING: {} - Operation: {} - Period: {:?}",
            message,
            context.operation,
            context.period.map(|p| p.to_string())
        );
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "fintrack::sync",
            "{} - Operation: {} - Period: {:?} - Ticket: {:?}",
            message,
            context.operation,
            context.period.map(|p| p.to_string()),
            context.ticket
        );
    }
}

// ==================== Tests ====================

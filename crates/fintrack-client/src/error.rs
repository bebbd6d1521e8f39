//! Error types for fintrack-client

use thiserror::Error;

/// Failure to set up the HTTP client. Request failures are reported as
/// `fintrack_core::RemoteError` instead.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Unsupported scheme '{scheme}' for service URL (use http:// or https://)")]
    UnsupportedScheme { scheme: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

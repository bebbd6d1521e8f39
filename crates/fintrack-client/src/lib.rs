//! `FinanceService` over HTTP/JSON
//!
//! Endpoints, relative to the configured base URL:
//! - `GET    transactions/?month=M&year=Y`
//! - `GET    summary/?month=M&year=Y`
//! - `POST   transactions/`
//! - `DELETE transactions/{id}`

pub mod error;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use fintrack_config::ServiceConfig;
use fintrack_core::{FinanceService, NewTransaction, Period, RemoteError, Summary, Transaction, TransactionId};

pub use error::{ClientError, ClientResult};

/// HTTP client for the finance service
#[derive(Debug, Clone)]
pub struct HttpFinanceService {
    http: Client,
    base_url: Url,
}

impl HttpFinanceService {
    pub fn new(config: &ServiceConfig) -> ClientResult<Self> {
        let base_url = validate_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()?;

        log::debug!(target: "fintrack::client", "Using finance service at {}", base_url);
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url.join(path).map_err(|e| RemoteError::Service {
            status: None,
            message: format!("Failed to build URL for '{}': {}", path, e),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, period: Period) -> Result<T, RemoteError> {
        let url = self.endpoint(path)?;
        log::debug!(target: "fintrack::client", "GET {} for {}", url, period);

        let response = self
            .http
            .get(url)
            .query(&[("month", period.month().to_string()), ("year", period.year().to_string())])
            .send()
            .await
            .map_err(transport_error)?;

        read_json(check_status(response).await?).await
    }
}

#[async_trait]
impl FinanceService for HttpFinanceService {
    async fn list_transactions(&self, period: Period) -> Result<Vec<Transaction>, RemoteError> {
        self.get_json("transactions/", period).await
    }

    async fn summary(&self, period: Period) -> Result<Summary, RemoteError> {
        self.get_json("summary/", period).await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction, RemoteError> {
        let url = self.endpoint("transactions/")?;
        log::debug!(target: "fintrack::client", "POST {}", url);

        let response = self
            .http
            .post(url)
            .json(transaction)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(check_status(response).await?).await
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), RemoteError> {
        let mut url = self.endpoint("transactions/")?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Service {
                status: None,
                message: format!("Cannot append path to {}", self.base_url),
            })?
            .pop_if_empty()
            .push(id.as_str());
        log::debug!(target: "fintrack::client", "DELETE {}", url);

        let response = self.http.delete(url).send().await.map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Accept http(s) URLs (the parser already insists on a host); make sure
/// the path ends with `/` so
/// relative endpoints are appended rather than replacing the last segment.
fn validate_base_url(base_url: &str) -> ClientResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    log::debug!(target: "fintrack::client", "Service answered {}: {}", status, message);
    Err(RemoteError::Service {
        status: Some(status.as_u16()),
        message,
    })
}

/// `{"detail": ...}` → the detail; other bodies verbatim; empty → reason phrase
fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail: serde_json::Value::String(detail) }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    response.json::<T>().await.map_err(transport_error)
}

fn transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_decode() {
        RemoteError::Service {
            status: None,
            message: format!("Unreadable response: {}", error),
        }
    } else if error.is_timeout() {
        RemoteError::Network {
            message: format!("Request timed out: {}", error),
        }
    } else {
        RemoteError::Network {
            message: error.to_string(),
        }
    }
}

// ==================== Tests ====================

//! Backend HTTP boundary.
//!
//! Thin typed wrappers over the backend's REST endpoints. Localization, path
//! planning and motor control live behind these calls; the console only
//! forwards operator intent and reads history back.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tracker::drive::DriveCommand;
use tracker::transform::GridCoord;

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::history::{LogPage, RawRssi};

#[derive(Deserialize)]
struct MonitoringResponse {
    #[serde(default)]
    data: Vec<RawRssi>,
}

/// HTTP client for the robot backend.
#[derive(Debug, Clone)]
pub struct BackendApi {
    client: reqwest::Client,
    base_url: String,
}

impl BackendApi {
    /// Build a client for `config.backend_url` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Http`] if the TLS backend cannot initialize.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, base_url: config.backend_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /rssi/target_coordinate`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success statuses.
    pub async fn set_target_point(&self, target: GridCoord) -> Result<(), ConsoleError> {
        let path = "/rssi/target_coordinate";
        let request = self.request(Method::POST, path).json(&target);
        send(request, path).await?;
        Ok(())
    }

    /// `POST /motor/drive`; returns the backend's JSON as-is.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success statuses.
    pub async fn drive(&self, command: DriveCommand) -> Result<Value, ConsoleError> {
        let path = "/motor/drive";
        let request = self.request(Method::POST, path).json(&command);
        let response = send(request, path).await?;
        Ok(json_or_null(response).await)
    }

    /// `GET /rssi/start`; returns the backend's JSON as-is.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success statuses.
    pub async fn start_navigation(&self) -> Result<Value, ConsoleError> {
        let path = "/rssi/start";
        let response = send(self.request(Method::GET, path), path).await?;
        Ok(json_or_null(response).await)
    }

    /// `GET /logs/?day=..&page=..`.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses and malformed bodies.
    pub async fn fetch_logs(&self, day: &str, page: u32) -> Result<LogPage, ConsoleError> {
        let path = "/logs/";
        let request = self.request(Method::GET, path).query(&[("day", day.to_owned()), ("page", page.to_string())]);
        let response = send(request, path).await?;
        Ok(response.json::<LogPage>().await?)
    }

    /// `GET /monitoring/?date=..`.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses and malformed bodies.
    pub async fn fetch_monitoring(&self, date: &str) -> Result<Vec<RawRssi>, ConsoleError> {
        let path = "/monitoring/";
        let request = self.request(Method::GET, path).query(&[("date", date)]);
        let response = send(request, path).await?;
        Ok(response.json::<MonitoringResponse>().await?.data)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }
}

async fn send(request: RequestBuilder, path: &str) -> Result<Response, ConsoleError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(path, status = status.as_u16(), "backend response");
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ConsoleError::Status { path: path.to_owned(), status: status.as_u16(), body });
    }
    Ok(response)
}

async fn json_or_null(response: Response) -> Value {
    response.json::<Value>().await.unwrap_or(Value::Null)
}

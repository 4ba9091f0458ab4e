use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client as HttpClient, header::AUTHORIZATION};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::error::PollError;

/// Where the poller gets homework statuses from.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Endpoint identifier used in logs.
    fn endpoint(&self) -> &str;

    /// Fetch homework statuses updated since `from_date` (unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError>;
}

/// Client for the Practicum homework statuses endpoint.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: HttpClient,
    endpoint: Url,
    token: String,
}

impl EndpointClient {
    /// Create a client with its own HTTP transport bounded by `timeout`.
    pub fn new(endpoint: Url, token: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint, token))
    }

    /// Create a client on top of an existing HTTP transport.
    pub fn with_client(http: HttpClient, endpoint: Url, token: String) -> Self {
        Self { http, endpoint, token }
    }

    /// Fetch homework statuses updated since `from_date` (unix seconds).
    ///
    /// A non-positive `from_date` is replaced with the current time.
    pub async fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        let from_date = if from_date > 0 { from_date } else { Utc::now().timestamp() };
        let endpoint = self.endpoint.as_str();

        info!(endpoint, from_date, "Requesting homework statuses");

        let resp = self
            .http
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|source| PollError::Transport { endpoint: endpoint.to_owned(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::EndpointUnavailable { endpoint: endpoint.to_owned(), status });
        }

        resp.json::<Value>()
            .await
            .map_err(|source| PollError::Transport { endpoint: endpoint.to_owned(), source })
    }
}

#[async_trait]
impl HomeworkSource for EndpointClient {
    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        Self::fetch(self, from_date).await
    }
}

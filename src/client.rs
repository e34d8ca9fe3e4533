//! HTTP client used by the latency sampler and the row loader

use crate::{
    defaults,
    error::{AppError, Result},
    models::Config,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URL and decode the body as JSON
    ///
    /// Non-2xx statuses are errors; the body is not decoded for them.
    async fn get_json(&self, url: &str) -> Result<JsonResponse>;
}

/// A decoded JSON response
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status_code: u16,
    pub body: Value,
    /// URL that answered, after redirects
    pub final_url: String,
}

impl JsonResponse {
    /// Length of the body serialized back to JSON text
    pub fn serialized_len(&self) -> usize {
        serde_json::to_string(&self.body).map(|s| s.len()).unwrap_or(0)
    }
}

/// reqwest-backed client for the public REST API
pub struct ApiClient {
    client: Client,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client; `None` leaves reqwest without a request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(defaults::USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Create a client honoring the configured timeout
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.timeout())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl HttpClient for ApiClient {
    async fn get_json(&self, url: &str) -> Result<JsonResponse> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| AppError::validation(format!("Invalid URL '{}': {}", url, e)))?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(AppError::http_status(status.as_u16(), final_url));
        }

        let body = response.json::<Value>().await?;

        Ok(JsonResponse {
            status_code: status.as_u16(),
            body,
            final_url,
        })
    }
}

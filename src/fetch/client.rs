//! Resilient client for the upstream extraction service
//!
//! All network I/O in the crate goes through [`ExtractionClient`]. The
//! upstream renders the target page (including JavaScript) and returns the
//! raw body base64-encoded; it is known to be unstable, so every call runs
//! inside a bounded retry loop with classification-aware backoff.

use crate::config::{FetchConfig, UpstreamConfig};
use crate::fetch::FetchError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

/// Client for the upstream extraction service with retry/backoff
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
    initial_backoff: Duration,
}

impl ExtractionClient {
    /// Builds a client from the upstream and fetch configuration sections
    pub fn new(upstream: &UpstreamConfig, fetch: &FetchConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(fetch.request_timeout_secs))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            endpoint: upstream.endpoint.clone(),
            api_key: upstream.api_key.clone(),
            max_retries: fetch.max_retries,
            initial_backoff: Duration::from_millis(fetch.initial_backoff_ms),
        })
    }

    /// Fetches the rendered body of a URL through the extraction service.
    ///
    /// Retries up to the configured attempt budget. Rate-limit/overload
    /// responses (429, 503, 520) sleep the current backoff delay and double
    /// it; timeouts and other upstream or transport failures consume an
    /// attempt without sleeping; a malformed extraction response aborts
    /// immediately. Exhausting the budget returns the last observed error.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut delay = self.initial_backoff;
        let mut last_error = FetchError::Transport("no attempts made".to_string());

        for attempt in 1..=self.max_retries {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(error @ FetchError::RateLimited { .. }) => {
                    tracing::warn!(
                        "{} for {}, retrying ({}/{})",
                        error,
                        url,
                        attempt,
                        self.max_retries
                    );
                    last_error = error;
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(error @ FetchError::Malformed(_)) => {
                    // Unexpected response shape; retrying will not help
                    tracing::error!("Unexpected error for {}: {}", url, error);
                    return Err(error);
                }
                Err(error) => {
                    tracing::error!(
                        "Error for {}: {} ({}/{})",
                        url,
                        error,
                        attempt,
                        self.max_retries
                    );
                    last_error = error;
                }
            }
        }

        tracing::info!("Max retries reached for {}", url);
        Err(last_error)
    }

    /// A single attempt against the extraction service
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.api_key, Some(""))
            .json(&json!({ "url": url, "httpResponseBody": true }))
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if is_overloaded(status) {
            return Err(FetchError::RateLimited {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("upstream overloaded")
                    .to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(format!("invalid JSON body: {}", e)))?;

        let encoded = payload
            .get("httpResponseBody")
            .and_then(|v| v.as_str())
            .ok_or_else(|| FetchError::Malformed("missing httpResponseBody".to_string()))?;

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| FetchError::Malformed(format!("invalid base64 body: {}", e)))?;

        String::from_utf8(bytes)
            .map_err(|e| FetchError::Malformed(format!("body is not UTF-8: {}", e)))
    }
}

/// Rate-limit/overload statuses the upstream emits under load
fn is_overloaded(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 503 | 520)
}

fn classify_transport(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}

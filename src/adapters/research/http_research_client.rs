//! HTTP Research Client - Implementation of ResearchService over reqwest.
//!
//! Talks to the analysis service's JSON API:
//!
//! - `POST {base}/market-research` with `{product_idea, openai_api_key}`
//! - `GET  {base}/market-research` for the stored history
//! - `GET  {base}/` as a health probe
//!
//! Non-success responses carry `{"detail": "..."}`, which is surfaced
//! verbatim. No request is ever retried.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpResearchConfig::new("https://research.example.com/api");
//! let client = HttpResearchClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::research::{AnalysisResult, ProductIdea};
use crate::ports::{RemoteError, ResearchRequest, ResearchService};

const MARKET_RESEARCH_PATH: &str = "market-research";

/// Configuration for the HTTP research client.
#[derive(Debug, Clone)]
pub struct HttpResearchConfig {
    /// Base URL of the service, including any path prefix such as `/api`.
    pub base_url: String,
    /// Request timeout. `None` leaves the HTTP library's default in place.
    pub timeout: Option<Duration>,
}

impl HttpResearchConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Sets a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Research service reached over HTTP.
pub struct HttpResearchClient {
    config: HttpResearchConfig,
    client: Client,
}

impl HttpResearchClient {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpResearchConfig) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Joins the base URL and a path without doubling slashes.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn map_send_error(err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            RemoteError::network(format!("Connection failed: {}", err))
        } else {
            RemoteError::network(err.to_string())
        }
    }

    /// Passes successful responses through and converts the rest.
    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::rejected(status.as_u16(), parse_detail(&body)))
    }
}

/// Extracts a string `detail` field from an error body.
///
/// Validation failures put a list under `detail`; those are not
/// human-readable and are ignored.
fn parse_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .and_then(|detail| detail.as_str().map(str::to_string))
}

#[async_trait]
impl ResearchService for HttpResearchClient {
    async fn submit(&self, request: ResearchRequest) -> Result<AnalysisResult, RemoteError> {
        let payload = MarketResearchPayload {
            product_idea: &request.product_idea,
            openai_api_key: request.analysis_key.expose_secret(),
        };

        tracing::debug!(
            title = %request.product_idea.title,
            features = request.product_idea.core_features.len(),
            "Submitting market research request"
        );

        let response = self
            .client
            .post(self.endpoint(MARKET_RESEARCH_PATH))
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_send_error)?;
        let response = Self::check_status(response).await?;

        let result: AnalysisResult = response
            .json()
            .await
            .map_err(|e| RemoteError::invalid_response(format!("Failed to parse result: {}", e)))?;

        tracing::info!(research_id = %result.id(), "Market research completed");
        Ok(result)
    }

    async fn list_history(&self) -> Result<Vec<AnalysisResult>, RemoteError> {
        let response = self
            .client
            .get(self.endpoint(MARKET_RESEARCH_PATH))
            .send()
            .await
            .map_err(Self::map_send_error)?;
        let response = Self::check_status(response).await?;

        let history: Vec<AnalysisResult> = response
            .json()
            .await
            .map_err(|e| RemoteError::invalid_response(format!("Failed to parse history: {}", e)))?;

        tracing::debug!(entries = history.len(), "Fetched research history");
        Ok(history)
    }

    async fn is_available(&self) -> bool {
        match self.client.get(self.endpoint("")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Research service health probe failed: {}", e);
                false
            }
        }
    }
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct MarketResearchPayload<'a> {
    product_idea: &'a ProductIdea,
    openai_api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

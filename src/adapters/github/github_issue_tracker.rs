//! GitHub Issue Tracker - Implementation of IssueTracker for the GitHub REST API.
//!
//! Creates issues with `POST {api}/repos/{owner}/{repo}/issues` using a
//! personal access token (`Authorization: token ...`). Error bodies carry
//! `{"message": "..."}`, which is surfaced to the user when present.
//!
//! # Configuration
//!
//! ```ignore
//! let tracker = GitHubIssueTracker::new(GitHubConfig::default())?;
//! let issue = tracker.create_issue(&repo, &token, &draft).await?;
//! println!("Created issue #{}", issue.number);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::publication::{IssueDraft, RepositoryRef};
use crate::ports::{CreatedIssue, IssueTracker, PublicationError};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Configuration for the GitHub tracker.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL (default: https://api.github.com).
    pub api_base_url: String,
    /// User-Agent header; GitHub rejects requests without one.
    pub user_agent: String,
    /// Request timeout. `None` leaves the HTTP library's default in place.
    pub timeout: Option<Duration>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            user_agent: concat!("prd-expert/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

impl GitHubConfig {
    /// Sets a custom API base URL (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// GitHub issue tracker adapter.
pub struct GitHubIssueTracker {
    config: GitHubConfig,
    http_client: Client,
}

impl GitHubIssueTracker {
    /// Creates a tracker with the given configuration.
    pub fn new(config: GitHubConfig) -> Result<Self, PublicationError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
            PublicationError::Network(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn issues_url(&self, repository: &RepositoryRef) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.config.api_base_url.trim_end_matches('/'),
            repository.owner(),
            repository.name()
        )
    }
}

#[async_trait]
impl IssueTracker for GitHubIssueTracker {
    async fn create_issue(
        &self,
        repository: &RepositoryRef,
        token: &SecretString,
        draft: &IssueDraft,
    ) -> Result<CreatedIssue, PublicationError> {
        tracing::debug!(repository = %repository, title = %draft.title, "Creating GitHub issue");

        let response = self
            .http_client
            .post(self.issues_url(repository))
            .header("Authorization", format!("token {}", token.expose_secret()))
            .header("Accept", GITHUB_ACCEPT)
            .json(draft)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    PublicationError::Network(format!("Connection failed: {}", e))
                } else {
                    PublicationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GitHubErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            tracing::warn!(
                repository = %repository,
                status = status.as_u16(),
                "GitHub rejected issue creation"
            );
            return Err(PublicationError::from_status(status.as_u16(), message));
        }

        let created: GitHubIssueResponse = response.json().await.map_err(|e| {
            PublicationError::InvalidResponse(format!("Failed to parse issue: {}", e))
        })?;

        tracing::info!(repository = %repository, number = created.number, "GitHub issue created");

        Ok(CreatedIssue {
            number: created.number,
            html_url: created.html_url,
        })
    }
}

// ----- GitHub API Types -----

#[derive(Debug, Deserialize)]
struct GitHubIssueResponse {
    number: u64,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: Option<String>,
}

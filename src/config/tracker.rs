//! Issue tracker configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::research::is_http_url;
use crate::adapters::github::GitHubConfig;

/// Issue tracker (GitHub) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset keeps the HTTP library default
    pub timeout_secs: Option<u64>,
}

impl TrackerConfig {
    /// Adapter configuration for the GitHub client
    pub fn github_config(&self) -> GitHubConfig {
        let config = GitHubConfig::default()
            .with_base_url(self.api_base_url.clone())
            .with_user_agent(self.user_agent.clone());
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Validate tracker configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("tracker.api_base_url"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TRACKER__USER_AGENT"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_api_base_url() -> String {
    GitHubConfig::default().api_base_url
}

fn default_user_agent() -> String {
    GitHubConfig::default().user_agent
}

//! Research service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::research::HttpResearchConfig;

/// Research service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    /// Base URL of the analysis service, including any `/api` prefix
    pub base_url: String,

    /// Request timeout in seconds; unset keeps the HTTP library default
    pub timeout_secs: Option<u64>,
}

impl ResearchConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Adapter configuration for the HTTP client
    pub fn client_config(&self) -> HttpResearchConfig {
        let config = HttpResearchConfig::new(self.base_url.clone());
        match self.timeout() {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }

    /// Validate research configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("RESEARCH__BASE_URL"));
        }
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("research.base_url"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ResearchConfig {
        ResearchConfig {
            base_url: base_url.to_string(),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_client_config_carries_timeout() {
        let mut research = config("http://localhost:8001/api");
        assert_eq!(research.client_config().timeout, None);

        research.timeout_secs = Some(90);
        let client = research.client_config();
        assert_eq!(client.base_url, "http://localhost:8001/api");
        assert_eq!(client.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_validation_requires_base_url() {
        assert_eq!(
            config("  ").validate(),
            Err(ValidationError::MissingRequired("RESEARCH__BASE_URL"))
        );
    }

    #[test]
    fn test_validation_requires_http_scheme() {
        assert!(config("ftp://example.com").validate().is_err());
        assert!(config("https://research.example.com/api").validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let research = ResearchConfig {
            timeout_secs: Some(0),
            ..config("http://localhost")
        };
        assert_eq!(research.validate(), Err(ValidationError::InvalidTimeout));
    }
}

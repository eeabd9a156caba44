//! Research Service Port - Interface for the remote analysis service.
//!
//! The service turns a product idea into a market-research document and
//! keeps every result it produced. The domain only sees this contract;
//! adapters (HTTP, mock) provide the transport.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::research::{AnalysisResult, ProductIdea};

/// Message surfaced when the service gives no usable detail.
pub const GENERIC_RESEARCH_FAILURE: &str = "Failed to perform market research. Please try again.";

/// Port for the remote analysis service.
///
/// # Contract
///
/// Implementations must:
/// - Issue exactly one outbound request per `submit` call (no retries)
/// - Return history in the service's own order (most recent first)
/// - Carry the service's error detail in [`RemoteError::Rejected`] when present
#[async_trait]
pub trait ResearchService: Send + Sync {
    /// Requests a new analysis.
    async fn submit(&self, request: ResearchRequest) -> Result<AnalysisResult, RemoteError>;

    /// Fetches all stored analyses.
    async fn list_history(&self) -> Result<Vec<AnalysisResult>, RemoteError>;

    /// Checks whether the service answers at all.
    async fn is_available(&self) -> bool;
}

/// A validated analysis request.
#[derive(Debug)]
pub struct ResearchRequest {
    /// The idea with blank features already removed.
    pub product_idea: ProductIdea,
    /// Model provider key forwarded to the service.
    pub analysis_key: SecretString,
}

/// Errors from the research service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status.
    #[error("Research service returned status {status}")]
    Rejected { status: u16, detail: Option<String> },

    /// The request never completed.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with something we could not read.
    #[error("Invalid response from research service: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Creates a rejection carrying the service-provided detail.
    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        Self::Rejected { status, detail }
    }

    /// Creates a network error.
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network(reason.into())
    }

    /// Creates an invalid response error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse(reason.into())
    }

    /// The message shown to the user: the service's detail verbatim when
    /// it sent one, otherwise a generic failure message.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Rejected {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => GENERIC_RESEARCH_FAILURE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_service_detail() {
        let err = RemoteError::rejected(400, Some("OpenAI API key is required".to_string()));
        assert_eq!(err.user_message(), "OpenAI API key is required");
    }

    #[test]
    fn user_message_falls_back_to_generic() {
        assert_eq!(
            RemoteError::rejected(502, None).user_message(),
            GENERIC_RESEARCH_FAILURE
        );
        assert_eq!(
            RemoteError::network("connection refused").user_message(),
            GENERIC_RESEARCH_FAILURE
        );
        assert_eq!(
            RemoteError::rejected(500, Some("  ".to_string())).user_message(),
            GENERIC_RESEARCH_FAILURE
        );
    }

    #[test]
    fn research_service_is_object_safe() {
        fn check<T: ResearchService + ?Sized>() {}
        check::<dyn ResearchService>();
    }
}

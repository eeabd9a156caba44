//! Issue Tracker Port - Interface for publishing analyses as issues.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::publication::{IssueDraft, RepositoryRef};

/// Message surfaced when the tracker gives no usable detail.
pub const GENERIC_PUBLICATION_FAILURE: &str = "Failed to create GitHub issue";

/// Port for an external issue tracker.
///
/// # Contract
///
/// Implementations must perform exactly one write per call and never retry.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Creates an issue in `repository` authenticated with `token`.
    async fn create_issue(
        &self,
        repository: &RepositoryRef,
        token: &SecretString,
        draft: &IssueDraft,
    ) -> Result<CreatedIssue, PublicationError>;
}

/// An issue the tracker accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Tracker-assigned issue number.
    pub number: u64,
    /// Browser URL of the issue, when the tracker reports one.
    pub html_url: Option<String>,
}

/// Errors from publishing an issue, including local precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublicationError {
    #[error("No analysis to publish")]
    MissingDocument,

    #[error("Tracker token is required")]
    MissingToken,

    #[error("bad repository format: expected 'owner/repo'")]
    BadRepositoryFormat,

    #[error("Tracker rejected the credentials")]
    Unauthorized { message: Option<String> },

    #[error("Repository not found")]
    RepositoryNotFound { message: Option<String> },

    #[error("Tracker rate limit exceeded")]
    RateLimited { message: Option<String> },

    #[error("Tracker returned status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from tracker: {0}")]
    InvalidResponse(String),
}

impl PublicationError {
    /// Maps a tracker error status and its optional `message` field.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 | 403 if !is_rate_limit_message(message.as_deref()) => {
                Self::Unauthorized { message }
            }
            403 | 429 => Self::RateLimited { message },
            404 => Self::RepositoryNotFound { message },
            _ => Self::Rejected { status, message },
        }
    }

    /// The message shown to the user.
    ///
    /// Local precondition failures describe themselves; remote failures
    /// use the tracker's message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            PublicationError::MissingDocument
            | PublicationError::MissingToken
            | PublicationError::BadRepositoryFormat => self.to_string(),
            PublicationError::Unauthorized { message }
            | PublicationError::RepositoryNotFound { message }
            | PublicationError::RateLimited { message }
            | PublicationError::Rejected { message, .. } => match message {
                Some(m) if !m.trim().is_empty() => m.clone(),
                _ => GENERIC_PUBLICATION_FAILURE.to_string(),
            },
            PublicationError::Network(_) | PublicationError::InvalidResponse(_) => {
                GENERIC_PUBLICATION_FAILURE.to_string()
            }
        }
    }
}

fn is_rate_limit_message(message: Option<&str>) -> bool {
    message.is_some_and(|m| m.to_lowercase().contains("rate limit"))
}

//! PublishIssueHandler - Command handler for publishing a result as an issue.

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::domain::publication::{IssueDraft, RepositoryRef};
use crate::domain::research::AnalysisResult;
use crate::ports::{CreatedIssue, IssueTracker, PublicationError};

/// Command to publish a result.
#[derive(Debug)]
pub struct PublishIssueCommand {
    pub document: Option<AnalysisResult>,
    pub token: Option<SecretString>,
    /// Raw `owner/repo` input.
    pub repository: String,
    /// Date shown in the issue footer.
    pub date: NaiveDate,
}

/// Handler for issue publication.
///
/// All preconditions are checked before the tracker is contacted; a valid
/// command results in exactly one create call.
pub struct PublishIssueHandler {
    tracker: Arc<dyn IssueTracker>,
}

impl PublishIssueHandler {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    pub async fn handle(&self, cmd: PublishIssueCommand) -> Result<CreatedIssue, PublicationError> {
        // 1. Preconditions
        let document = cmd.document.ok_or(PublicationError::MissingDocument)?;
        let token = match cmd.token {
            Some(token) if !token.expose_secret().trim().is_empty() => token,
            _ => return Err(PublicationError::MissingToken),
        };
        let repository = RepositoryRef::parse(&cmd.repository)
            .map_err(|_| PublicationError::BadRepositoryFormat)?;

        // 2. Compose and send
        let draft = IssueDraft::compose(&document, cmd.date);
        let created = self
            .tracker
            .create_issue(&repository, &token, &draft)
            .await
            .map_err(|err| {
                tracing::warn!(repository = %repository, error = %err, "Issue publication failed");
                err
            })?;

        tracing::info!(
            repository = %repository,
            number = created.number,
            research_id = %document.id(),
            "Published analysis as issue"
        );
        Ok(created)
    }
}

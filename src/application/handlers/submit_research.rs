//! SubmitResearchHandler - Command handler for requesting a new analysis.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::application::WorkflowError;
use crate::domain::foundation::ValidationError;
use crate::domain::research::{AnalysisResult, ProductIdea};
use crate::ports::{ResearchRequest, ResearchService};

/// Command to analyze a product idea.
#[derive(Debug)]
pub struct SubmitResearchCommand {
    pub idea: ProductIdea,
    pub analysis_key: Option<SecretString>,
}

/// Handler for analysis submissions.
///
/// Validates locally before any network access, then issues exactly one
/// request. No retries.
pub struct SubmitResearchHandler {
    service: Arc<dyn ResearchService>,
}

impl SubmitResearchHandler {
    pub fn new(service: Arc<dyn ResearchService>) -> Self {
        Self { service }
    }

    pub async fn handle(
        &self,
        cmd: SubmitResearchCommand,
    ) -> Result<AnalysisResult, WorkflowError> {
        // 1. Validate and drop blank feature slots
        let product_idea = cmd.idea.prepared_for_submission()?;

        let analysis_key = match cmd.analysis_key {
            Some(key) if !key.expose_secret().trim().is_empty() => key,
            _ => return Err(ValidationError::empty_field("analysis_key").into()),
        };

        tracing::info!(
            title = %product_idea.title,
            features = product_idea.core_features.len(),
            "Submitting market research request"
        );

        // 2. Single outbound request
        let result = self
            .service
            .submit(ResearchRequest {
                product_idea,
                analysis_key,
            })
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "Market research request failed");
                err
            })?;

        tracing::info!(research_id = %result.id(), "Market research completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::research::MockResearchService;
    use crate::ports::RemoteError;
    use proptest::prelude::*;

    fn key() -> Option<SecretString> {
        Some(SecretString::new("sk-test".to_string()))
    }

    fn idea(title: &str, target_user: &str, features: &[&str]) -> ProductIdea {
        ProductIdea::new(
            title,
            target_user,
            features.iter().map(|f| f.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn submits_filtered_idea() {
        let service = MockResearchService::new();
        let handler = SubmitResearchHandler::new(Arc::new(service.clone()));

        let result = handler
            .handle(SubmitResearchCommand {
                idea: idea("Idea", "Users", &["A", "  ", "", "B"]),
                analysis_key: key(),
            })
            .await
            .unwrap();

        assert_eq!(result.product_idea().core_features, vec!["A", "B"]);
        assert_eq!(service.submit_count(), 1);
        assert_eq!(service.submitted_ideas()[0].core_features, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_without_request() {
        let service = MockResearchService::new();
        let handler = SubmitResearchHandler::new(Arc::new(service.clone()));

        let err = handler
            .handle(SubmitResearchCommand {
                idea: idea("   ", "Users", &[]),
                analysis_key: key(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::Validation(ValidationError::empty_field("title")));
        assert_eq!(service.submit_count(), 0);
    }

    #[tokio::test]
    async fn missing_key_is_rejected_without_request() {
        let service = MockResearchService::new();
        let handler = SubmitResearchHandler::new(Arc::new(service.clone()));

        for analysis_key in [None, Some(SecretString::new("  ".to_string()))] {
            let err = handler
                .handle(SubmitResearchCommand {
                    idea: idea("Idea", "Users", &[]),
                    analysis_key,
                })
                .await
                .unwrap_err();
            assert_eq!(
                err,
                WorkflowError::Validation(ValidationError::empty_field("analysis_key"))
            );
        }
        assert_eq!(service.submit_count(), 0);
    }

    #[tokio::test]
    async fn remote_failure_is_surfaced() {
        let service = MockResearchService::new()
            .with_error(RemoteError::rejected(400, Some("OpenAI API key is invalid".into())));
        let handler = SubmitResearchHandler::new(Arc::new(service.clone()));

        let err = handler
            .handle(SubmitResearchCommand {
                idea: idea("Idea", "Users", &[]),
                analysis_key: key(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "OpenAI API key is invalid");
        assert_eq!(service.submit_count(), 1);
    }

    proptest! {
        #[test]
        fn never_sends_blank_features(
            features in proptest::collection::vec(
                prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,8}"],
                0..10,
            )
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let service = MockResearchService::new();
            let handler = SubmitResearchHandler::new(Arc::new(service.clone()));

            runtime.block_on(handler.handle(SubmitResearchCommand {
                idea: ProductIdea::new("Idea", "Users", features.clone()),
                analysis_key: key(),
            })).unwrap();

            let sent = &service.submitted_ideas()[0].core_features;
            prop_assert!(sent.iter().all(|f| !f.trim().is_empty()));
            prop_assert_eq!(sent.len(), features.iter().filter(|f| !f.trim().is_empty()).count());
        }
    }
}

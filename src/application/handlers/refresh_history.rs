//! RefreshHistoryHandler - Query handler for recent analyses.

use std::sync::Arc;

use crate::domain::research::{truncate_to_display_limit, AnalysisResult};
use crate::ports::{RemoteError, ResearchService};

/// Handler fetching the most recent analyses, capped to the display limit.
pub struct RefreshHistoryHandler {
    service: Arc<dyn ResearchService>,
}

impl RefreshHistoryHandler {
    pub fn new(service: Arc<dyn ResearchService>) -> Self {
        Self { service }
    }

    /// Fetches history in server order and keeps the first entries only.
    ///
    /// Errors are returned to the caller; deciding to swallow them is the
    /// workspace's job.
    pub async fn handle(&self) -> Result<Vec<AnalysisResult>, RemoteError> {
        let fetched = self.service.list_history().await?;
        let total = fetched.len();
        let entries = truncate_to_display_limit(fetched);
        tracing::debug!(fetched = total, kept = entries.len(), "History refreshed");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::research::MockResearchService;
    use crate::domain::foundation::{ResearchId, Timestamp};
    use crate::domain::research::{ProductIdea, HISTORY_DISPLAY_LIMIT};

    fn entry(n: usize) -> AnalysisResult {
        AnalysisResult::new(
            ResearchId::new(format!("r-{}", n)),
            Timestamp::now(),
            ProductIdea::new(format!("Idea {}", n), "Users", vec![]),
            "Body",
        )
    }

    #[tokio::test]
    async fn truncates_to_display_limit_in_server_order() {
        let service = MockResearchService::new().with_history((0..8).map(entry).collect());
        let handler = RefreshHistoryHandler::new(Arc::new(service.clone()));

        let entries = handler.handle().await.unwrap();

        assert_eq!(entries.len(), HISTORY_DISPLAY_LIMIT);
        let ids: Vec<_> = entries.iter().map(|e| e.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["r-0", "r-1", "r-2", "r-3", "r-4"]);
        assert_eq!(service.history_call_count(), 1);
    }

    #[tokio::test]
    async fn short_history_is_returned_whole() {
        let service = MockResearchService::new().with_history(vec![entry(1), entry(2)]);
        let handler = RefreshHistoryHandler::new(Arc::new(service));

        assert_eq!(handler.handle().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn propagates_service_errors() {
        let service =
            MockResearchService::new().with_history_error(RemoteError::network("refused"));
        let handler = RefreshHistoryHandler::new(Arc::new(service));

        assert!(handler.handle().await.is_err());
    }
}

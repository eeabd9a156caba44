//! Analysis result: the structured document returned by the research service.

use serde::{Deserialize, Serialize};

use super::ProductIdea;
use crate::domain::foundation::{ResearchId, Timestamp};

/// Immutable result of one market-research analysis.
///
/// The body is markdown and is handed to renderers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    id: ResearchId,
    timestamp: Timestamp,
    product_idea: ProductIdea,
    #[serde(rename = "markdown_output")]
    body: String,
}

impl AnalysisResult {
    pub fn new(
        id: ResearchId,
        timestamp: Timestamp,
        product_idea: ProductIdea,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            product_idea,
            body: body.into(),
        }
    }

    pub fn id(&self) -> &ResearchId {
        &self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn product_idea(&self) -> &ProductIdea {
        &self.product_idea
    }

    /// Markdown body of the document.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn title(&self) -> &str {
        &self.product_idea.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_payload() {
        let json = r###"{
            "id": "4f1c",
            "product_idea": {
                "title": "Async feedback platform",
                "target_user": "PeopleOps teams",
                "core_features": ["Slack integration"]
            },
            "markdown_output": "## Competitive Landscape",
            "timestamp": "2025-06-01T08:15:30.250000"
        }"###;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.id().as_str(), "4f1c");
        assert_eq!(result.title(), "Async feedback platform");
        assert_eq!(result.body(), "## Competitive Landscape");
        assert_eq!(result.timestamp().date().to_string(), "2025-06-01");
    }

    #[test]
    fn serializes_body_as_markdown_output() {
        let result = AnalysisResult::new(
            ResearchId::new("r1"),
            Timestamp::now(),
            ProductIdea::new("T", "U", vec![]),
            "# Body",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["markdown_output"], "# Body");
        assert!(json.get("body").is_none());
    }
}

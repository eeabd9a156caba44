//! Issue composition for publishing an analysis to the tracker.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::research::AnalysisResult;

/// Labels attached to every published analysis.
pub const ISSUE_LABELS: [&str; 3] = ["PRD", "product-requirements", "market-research"];

const ISSUE_TITLE_PREFIX: &str = "PRD: ";
const ISSUE_HEADER: &str = "# Market Research & Competitive Analysis";
const GENERATOR_NAME: &str = "PRD Expert Agent";

/// Issue payload ready to be submitted to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueDraft {
    /// Composes an issue embedding the analysis body verbatim.
    pub fn compose(result: &AnalysisResult, date: NaiveDate) -> Self {
        let body = format!(
            "{header}\n\n{body}\n\n---\n\n*Generated by {generator} on {date}*\n",
            header = ISSUE_HEADER,
            body = result.body(),
            generator = GENERATOR_NAME,
            date = date.format("%Y-%m-%d"),
        );

        Self {
            title: format!("{}{}", ISSUE_TITLE_PREFIX, result.title()),
            body,
            labels: ISSUE_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ResearchId, Timestamp};
    use crate::domain::research::ProductIdea;

    fn result() -> AnalysisResult {
        AnalysisResult::new(
            ResearchId::new("r1"),
            Timestamp::now(),
            ProductIdea::new("Async feedback platform", "PeopleOps teams", vec![]),
            "| Product | Pricing |\n|---|---|\n| A | $10 |",
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn title_is_prefixed() {
        assert_eq!(
            IssueDraft::compose(&result(), date()).title,
            "PRD: Async feedback platform"
        );
    }

    #[test]
    fn body_embeds_result_verbatim_between_header_and_footer() {
        let draft = IssueDraft::compose(&result(), date());
        assert!(draft.body.starts_with(ISSUE_HEADER));
        assert!(draft.body.contains(result().body()));
        assert!(draft.body.contains("\n---\n"));
        assert!(draft
            .body
            .trim_end()
            .ends_with("*Generated by PRD Expert Agent on 2025-03-07*"));

        let body_at = draft.body.find(result().body()).unwrap();
        let separator_at = draft.body.rfind("---").unwrap();
        assert!(body_at < separator_at);
    }

    #[test]
    fn labels_are_fixed() {
        let draft = IssueDraft::compose(&result(), date());
        assert_eq!(draft.labels, vec!["PRD", "product-requirements", "market-research"]);
    }

    #[test]
    fn serializes_tracker_payload() {
        let json = serde_json::to_value(IssueDraft::compose(&result(), date())).unwrap();
        assert_eq!(json["title"], "PRD: Async feedback platform");
        assert_eq!(json["labels"].as_array().unwrap().len(), 3);
    }
}

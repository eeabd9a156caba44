//! Deterministic artifact naming.

use chrono::NaiveDate;

const FALLBACK_BASE_NAME: &str = "market_research";

/// Builds the base filename (no extension) for an exported document.
///
/// Runs of whitespace in the title become a single underscore and the date
/// is appended as `YYYY-MM-DD`. Path separators become `-` so the name
/// always stays a single path component.
///
/// Leading and trailing whitespace is dropped rather than turned into
/// underscores, and a blank title falls back to `market_research`, so a
/// name never starts with `_` or consists of the date alone.
pub fn artifact_base_name(title: &str, date: NaiveDate) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    let stem = if words.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        words.join("_").replace(['/', '\\'], "-")
    };
    format!("{}_{}", stem, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn replaces_whitespace_with_underscores() {
        assert_eq!(
            artifact_base_name("Async feedback platform", date()),
            "Async_feedback_platform_2025-03-07"
        );
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            artifact_base_name("  Async \t feedback\nplatform ", date()),
            "Async_feedback_platform_2025-03-07"
        );
    }

    #[test]
    fn blank_title_uses_fallback() {
        assert_eq!(artifact_base_name("   ", date()), "market_research_2025-03-07");
    }

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(
            artifact_base_name("A/B testing\\tool", date()),
            "A-B_testing-tool_2025-03-07"
        );
    }
}

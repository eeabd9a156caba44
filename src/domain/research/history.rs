//! History cache: the most recent analyses, as ordered by the service.

use super::AnalysisResult;

/// Number of history entries shown to the user.
///
/// A display cap only; the service may hold more.
pub const HISTORY_DISPLAY_LIMIT: usize = 5;

/// Most-recent-first list of past analyses, never longer than
/// [`HISTORY_DISPLAY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryCache {
    entries: Vec<AnalysisResult>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached entries with the first entries of `fetched`,
    /// preserving the service's order.
    pub fn replace(&mut self, fetched: Vec<AnalysisResult>) {
        self.entries = truncate_to_display_limit(fetched);
    }

    pub fn entries(&self) -> &[AnalysisResult] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&AnalysisResult> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps the leading [`HISTORY_DISPLAY_LIMIT`] entries.
pub fn truncate_to_display_limit(mut entries: Vec<AnalysisResult>) -> Vec<AnalysisResult> {
    entries.truncate(HISTORY_DISPLAY_LIMIT);
    entries
}

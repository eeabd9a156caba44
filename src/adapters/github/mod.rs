//! GitHub issue tracker adapters.

mod github_issue_tracker;
mod mock_issue_tracker;

pub use github_issue_tracker::{GitHubConfig, GitHubIssueTracker};
pub use mock_issue_tracker::{MockIssueTracker, RecordedIssue};

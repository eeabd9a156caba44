//! Application handlers.
//!
//! Stateless command and query handlers, one per workflow step. Each handler
//! owns the ports it needs and performs at most one outbound call per
//! invocation.

mod export_document;
mod publish_issue;
mod refresh_history;
mod submit_research;

pub use export_document::{
    ExportDocumentCommand, ExportDocumentHandler, ExportReceipt, ExportSettings,
    DEFAULT_EXPORT_SCALE,
};
pub use publish_issue::{PublishIssueCommand, PublishIssueHandler};
pub use refresh_history::RefreshHistoryHandler;
pub use submit_research::{SubmitResearchCommand, SubmitResearchHandler};

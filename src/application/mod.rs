//! Application layer - Handlers and the session workspace.
//!
//! Handlers are stateless and each wraps one workflow step. The
//! [`ResearchWorkspace`] holds the session state and enforces the
//! single-flight rule per [`Operation`].

mod error;
pub mod handlers;
mod notice;
mod operation;
mod workspace;

pub use error::WorkflowError;
pub use handlers::{
    ExportDocumentCommand, ExportDocumentHandler, ExportReceipt, ExportSettings,
    PublishIssueCommand, PublishIssueHandler, RefreshHistoryHandler, SubmitResearchCommand,
    SubmitResearchHandler, DEFAULT_EXPORT_SCALE,
};
pub use notice::{Notice, EXPORT_NOTICE_DURATION, PUBLICATION_NOTICE_DURATION};
pub use operation::{InFlightGuard, Operation, OperationStatus, OperationTracker};
pub use workspace::{ResearchWorkspace, WorkspacePorts};

//! Workflow error - the single error type callers of the application layer see.

use thiserror::Error;

use super::Operation;
use crate::domain::foundation::ValidationError;
use crate::ports::{ExportError, PublicationError, RemoteError};

/// Any failure of a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Local precondition failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Publication(#[from] PublicationError),

    /// The same operation is already in flight.
    #[error("Another {0} is already in progress")]
    Busy(Operation),
}

impl WorkflowError {
    /// The human-readable message to display.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(err) => validation_message(err),
            WorkflowError::Remote(err) => err.user_message(),
            WorkflowError::Export(err) => format!("Export failed: {}", err),
            WorkflowError::Publication(err) => err.user_message(),
            WorkflowError::Busy(_) => self.to_string(),
        }
    }

    /// True if the failure happened before any network access.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_)
                | WorkflowError::Busy(_)
                | WorkflowError::Publication(
                    PublicationError::MissingDocument
                        | PublicationError::MissingToken
                        | PublicationError::BadRepositoryFormat
                )
                | WorkflowError::Export(ExportError::MissingDocument)
        )
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err.field() {
        "title" | "target_user" => "Please fill in the product title and target user".to_string(),
        "analysis_key" => "Please provide your OpenAI API key".to_string(),
        _ => err.to_string(),
    }
}

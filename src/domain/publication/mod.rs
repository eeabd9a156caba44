//! Issue publication domain: repository references and issue composition.

mod issue;
mod repository;

pub use issue::{IssueDraft, ISSUE_LABELS};
pub use repository::RepositoryRef;

//! Artifact Store Port - Persisting exported documents.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{ExportError, ExportedDocument};

/// Port for saving exported documents.
///
/// # Contract
///
/// Implementations must write atomically: on failure no file (partial or
/// otherwise) is left under the artifact's final name.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Saves the document under its own filename.
    async fn save(&self, document: &ExportedDocument) -> Result<StoredArtifact, ExportError>;
}

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub location: PathBuf,
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_store_is_object_safe() {
        fn check<T: ArtifactStore + ?Sized>() {}
        check::<dyn ArtifactStore>();
    }
}

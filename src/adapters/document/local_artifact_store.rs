//! Local Artifact Store - Implementation of ArtifactStore on the filesystem.
//!
//! # Atomic Writes
//!
//! Uses a write-to-temp-then-rename pattern:
//! 1. Write content to `{filename}.partial`
//! 2. Sync to disk
//! 3. Rename to `{filename}`
//!
//! A failed save removes the partial file, so the final name either holds
//! the complete artifact or nothing new.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{ArtifactStore, ExportError, ExportedDocument, StoredArtifact};

/// Saves exported documents into one output directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    output_dir: PathBuf,
}

impl LocalArtifactStore {
    /// Creates a store writing into `output_dir` (created on first save).
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn partial_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(format!("{}.partial", filename))
    }

    async fn write_partial(&self, path: &Path, content: &[u8]) -> Result<(), ExportError> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            ExportError::io_error(format!("Failed to create {}: {}", path.display(), e))
        })?;

        file.write_all(content).await.map_err(|e| {
            ExportError::io_error(format!("Failed to write {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            ExportError::io_error(format!("Failed to sync {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn save(&self, document: &ExportedDocument) -> Result<StoredArtifact, ExportError> {
        if document.filename.is_empty()
            || document.filename.contains('/')
            || document.filename.contains('\\')
        {
            return Err(ExportError::io_error(format!(
                "Invalid artifact filename '{}'",
                document.filename
            )));
        }

        fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            ExportError::io_error(format!(
                "Failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let partial = self.partial_path(&document.filename);
        let final_path = self.output_dir.join(&document.filename);

        let written = match self.write_partial(&partial, &document.content).await {
            Ok(()) => fs::rename(&partial, &final_path).await.map_err(|e| {
                ExportError::io_error(format!(
                    "Failed to rename {} to {}: {}",
                    partial.display(),
                    final_path.display(),
                    e
                ))
            }),
            Err(e) => Err(e),
        };

        if let Err(err) = written {
            let _ = fs::remove_file(&partial).await;
            tracing::warn!(filename = %document.filename, error = %err, "Artifact save failed");
            return Err(err);
        }

        tracing::info!(
            location = %final_path.display(),
            bytes = document.content.len(),
            "Artifact saved"
        );

        Ok(StoredArtifact {
            location: final_path,
            size_bytes: document.content.len() as u64,
        })
    }
}

//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `ResearchService` - Remote analysis service (submit, history, health)
//! - `IssueTracker` - External issue tracker for publishing analyses
//!
//! ## Export Ports
//!
//! - `DocumentRasterizer` - Snapshot of the rendered document as one tall image
//! - `PageAssembler` - Paginated image to multi-page document bytes
//! - `ArtifactStore` - Atomic persistence of exported documents

mod artifact_store;
mod document_export_service;
mod document_rasterizer;
mod issue_tracker;
mod research_service;

pub use artifact_store::{ArtifactStore, StoredArtifact};
pub use document_export_service::{ExportError, ExportFormat, ExportedDocument, PageAssembler};
pub use document_rasterizer::{DocumentRasterizer, RasterImage};
pub use issue_tracker::{CreatedIssue, IssueTracker, PublicationError, GENERIC_PUBLICATION_FAILURE};
pub use research_service::{
    RemoteError, ResearchRequest, ResearchService, GENERIC_RESEARCH_FAILURE,
};

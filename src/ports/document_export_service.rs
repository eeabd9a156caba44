//! Document Export Port - Page assembly and exported artifacts.
//!
//! This port defines the contract for turning a paginated raster into a
//! multi-page document. The export handler depends on this trait, while
//! adapters (like `LopdfPageAssembler`) provide the implementation.

use thiserror::Error;

use super::RasterImage;
use crate::domain::export::{PagePlan, PaginationError};

/// Port for assembling page bands into a single document.
///
/// # Contract
///
/// Implementations must:
/// - Emit exactly `plan.page_count()` pages, in order
/// - Place the whole image on every page at the plan's offset
/// - Return the complete document bytes or an error, never a partial document
///
/// # Usage
///
/// ```rust,ignore
/// let assembler: &dyn PageAssembler = get_assembler();
/// let plan = PagePlan::compute(
///     image.width(),
///     image.height(),
///     PageGeometry::A4,
///     TailPolicy::default(),
/// )?;
/// let pdf_bytes = assembler.assemble(&image, &plan)?;
/// ```
pub trait PageAssembler: Send + Sync {
    /// Assembles the paginated image into document bytes.
    fn assemble(&self, image: &RasterImage, plan: &PagePlan) -> Result<Vec<u8>, ExportError>;
}

/// Export formats supported by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Raw markdown body (no conversion needed).
    Markdown,
    /// Image-based PDF document.
    Pdf,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Exported document with content and metadata.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// The exported content as bytes.
    pub content: Vec<u8>,
    /// Filename including extension.
    pub filename: String,
    /// The format that was used.
    pub format: ExportFormat,
}

impl ExportedDocument {
    /// Create a new exported document.
    pub fn new(content: Vec<u8>, format: ExportFormat, base_filename: &str) -> Self {
        Self {
            content,
            filename: format!("{}.{}", base_filename, format.extension()),
            format,
        }
    }

    /// Create from markdown content.
    pub fn from_markdown(markdown: String, base_filename: &str) -> Self {
        Self::new(markdown.into_bytes(), ExportFormat::Markdown, base_filename)
    }

    /// Create from PDF bytes.
    pub fn from_pdf(pdf_bytes: Vec<u8>, base_filename: &str) -> Self {
        Self::new(pdf_bytes, ExportFormat::Pdf, base_filename)
    }
}

/// Errors that can occur during document export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// There is no rendered document to export.
    #[error("No document to export")]
    MissingDocument,

    /// Rasterizing the rendered document failed.
    #[error("Rasterization failed: {0}")]
    RasterizationFailed(String),

    /// The rasterizer's external renderer is not available.
    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// Building the multi-page document failed.
    #[error("Page assembly failed: {0}")]
    AssemblyFailed(String),

    /// I/O error while saving the artifact.
    #[error("I/O error during export: {0}")]
    IoError(String),
}

impl ExportError {
    /// Create a rasterization error.
    pub fn rasterization_failed(reason: impl Into<String>) -> Self {
        Self::RasterizationFailed(reason.into())
    }

    /// Create a renderer unavailable error.
    pub fn renderer_unavailable(reason: impl Into<String>) -> Self {
        Self::RendererUnavailable(reason.into())
    }

    /// Create an assembly error.
    pub fn assembly_failed(reason: impl Into<String>) -> Self {
        Self::AssemblyFailed(reason.into())
    }

    /// Create an I/O error.
    pub fn io_error(reason: impl Into<String>) -> Self {
        Self::IoError(reason.into())
    }
}

impl From<PaginationError> for ExportError {
    fn from(err: PaginationError) -> Self {
        ExportError::RasterizationFailed(err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

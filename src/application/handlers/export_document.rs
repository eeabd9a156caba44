//! ExportDocumentHandler - Command handler for saving the result as a file.
//!
//! PDF export runs the page-band pipeline:
//! 1. Rasterize the rendered result into one tall image
//! 2. Plan the page bands (`PagePlan::compute`)
//! 3. Assemble the pages (on the blocking pool)
//! 4. Save the artifact atomically
//!
//! Any failure aborts before the store is touched, so no partial artifact
//! exists under the final name.

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::export::{artifact_base_name, PageGeometry, PagePlan, TailPolicy};
use crate::domain::research::AnalysisResult;
use crate::ports::{
    ArtifactStore, DocumentRasterizer, ExportError, ExportFormat, ExportedDocument, PageAssembler,
};

/// Rasterization density multiplier used unless configured otherwise.
pub const DEFAULT_EXPORT_SCALE: f32 = 2.0;

/// Tunables for PDF export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSettings {
    pub scale: f32,
    pub geometry: PageGeometry,
    pub tail_policy: TailPolicy,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_EXPORT_SCALE,
            geometry: PageGeometry::A4,
            tail_policy: TailPolicy::default(),
        }
    }
}

impl ExportSettings {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_tail_policy(mut self, policy: TailPolicy) -> Self {
        self.tail_policy = policy;
        self
    }
}

/// Command to export a result.
#[derive(Debug, Clone)]
pub struct ExportDocumentCommand {
    pub document: AnalysisResult,
    /// Calendar date stamped into the filename.
    pub date: NaiveDate,
}

/// Where an export landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub location: PathBuf,
    pub format: ExportFormat,
    /// Number of pages; `None` for unpaginated formats.
    pub page_count: Option<usize>,
}

/// Handler for document exports.
pub struct ExportDocumentHandler {
    rasterizer: Arc<dyn DocumentRasterizer>,
    assembler: Arc<dyn PageAssembler>,
    store: Arc<dyn ArtifactStore>,
    settings: ExportSettings,
}

impl ExportDocumentHandler {
    pub fn new(
        rasterizer: Arc<dyn DocumentRasterizer>,
        assembler: Arc<dyn PageAssembler>,
        store: Arc<dyn ArtifactStore>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            rasterizer,
            assembler,
            store,
            settings,
        }
    }

    /// Exports the result as a paginated image-based PDF.
    pub async fn handle(&self, cmd: ExportDocumentCommand) -> Result<ExportReceipt, ExportError> {
        let base_name = artifact_base_name(cmd.document.title(), cmd.date);

        // 1. Rasterize
        let image = self
            .rasterizer
            .rasterize(&cmd.document, self.settings.scale)
            .await?;

        // 2. Plan page bands
        let plan = PagePlan::compute(
            image.width(),
            image.height(),
            self.settings.geometry,
            self.settings.tail_policy,
        )?;
        let page_count = plan.page_count();

        tracing::debug!(
            research_id = %cmd.document.id(),
            raster_width = image.width(),
            raster_height = image.height(),
            pages = page_count,
            "Planned PDF pages"
        );

        // 3. Assemble off the async runtime
        let assembler = Arc::clone(&self.assembler);
        let pdf = tokio::task::spawn_blocking(move || assembler.assemble(&image, &plan))
            .await
            .map_err(|e| ExportError::assembly_failed(format!("Assembly task failed: {}", e)))??;

        // 4. Save
        let document = ExportedDocument::from_pdf(pdf, &base_name);
        let stored = self.store.save(&document).await?;

        tracing::info!(
            filename = %document.filename,
            pages = page_count,
            "PDF exported"
        );

        Ok(ExportReceipt {
            filename: document.filename,
            location: stored.location,
            format: ExportFormat::Pdf,
            page_count: Some(page_count),
        })
    }

    /// Saves the markdown body verbatim.
    pub async fn handle_markdown(
        &self,
        cmd: ExportDocumentCommand,
    ) -> Result<ExportReceipt, ExportError> {
        let base_name = artifact_base_name(cmd.document.title(), cmd.date);
        let document = ExportedDocument::from_markdown(cmd.document.body().to_string(), &base_name);
        let stored = self.store.save(&document).await?;

        tracing::info!(filename = %document.filename, "Markdown exported");

        Ok(ExportReceipt {
            filename: document.filename,
            location: stored.location,
            format: ExportFormat::Markdown,
            page_count: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::{LocalArtifactStore, LopdfPageAssembler, MockRasterizer};
    use crate::domain::foundation::{ResearchId, Timestamp};
    use crate::domain::research::ProductIdea;
    use tempfile::TempDir;

    fn document() -> AnalysisResult {
        AnalysisResult::new(
            ResearchId::new("r-1"),
            Timestamp::now(),
            ProductIdea::new("Async feedback platform", "PeopleOps teams", vec![]),
            "## Competitive Landscape",
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    fn handler(
        rasterizer: MockRasterizer,
        dir: &TempDir,
        settings: ExportSettings,
    ) -> ExportDocumentHandler {
        ExportDocumentHandler::new(
            Arc::new(rasterizer),
            Arc::new(LopdfPageAssembler::new()),
            Arc::new(LocalArtifactStore::new(dir.path())),
            settings,
        )
    }

    fn command() -> ExportDocumentCommand {
        ExportDocumentCommand {
            document: document(),
            date: date(),
        }
    }

    #[tokio::test]
    async fn exports_pdf_named_after_title_and_date() {
        let dir = TempDir::new().unwrap();
        // 420x1000 at 2x -> 840x2000 px -> 500 mm -> 2 pages
        let rasterizer = MockRasterizer::new(420, 1000);
        let handler = handler(rasterizer.clone(), &dir, ExportSettings::default());

        let receipt = handler.handle(command()).await.unwrap();

        assert_eq!(receipt.filename, "Async_feedback_platform_2025-03-09.pdf");
        assert_eq!(receipt.page_count, Some(2));
        assert_eq!(receipt.location, dir.path().join(&receipt.filename));
        assert!(std::fs::read(&receipt.location).unwrap().starts_with(b"%PDF"));
        assert_eq!(rasterizer.get_calls()[0].1, DEFAULT_EXPORT_SCALE);
    }

    #[tokio::test]
    async fn exact_band_height_yields_one_page() {
        let dir = TempDir::new().unwrap();
        // 840x1180 px at 1x -> exactly 295 mm
        let handler = handler(
            MockRasterizer::new(840, 1180),
            &dir,
            ExportSettings::default().with_scale(1.0),
        );

        assert_eq!(handler.handle(command()).await.unwrap().page_count, Some(1));
    }

    #[tokio::test]
    async fn legacy_tail_policy_adds_trailing_page() {
        let dir = TempDir::new().unwrap();
        let handler = handler(
            MockRasterizer::new(840, 1180),
            &dir,
            ExportSettings::default()
                .with_scale(1.0)
                .with_tail_policy(TailPolicy::EmitZeroRemainderPage),
        );

        assert_eq!(handler.handle(command()).await.unwrap().page_count, Some(2));
    }

    #[tokio::test]
    async fn rasterization_failure_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let handler = handler(
            MockRasterizer::new(10, 10).with_error(ExportError::rasterization_failed("tainted")),
            &dir,
            ExportSettings::default(),
        );

        let err = handler.handle(command()).await.unwrap_err();

        assert_eq!(err, ExportError::rasterization_failed("tainted"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_raster_is_rejected() {
        let dir = TempDir::new().unwrap();
        let handler = handler(MockRasterizer::new(0, 0), &dir, ExportSettings::default());

        assert!(matches!(
            handler.handle(command()).await.unwrap_err(),
            ExportError::RasterizationFailed(_)
        ));
    }

    #[tokio::test]
    async fn markdown_export_writes_body_verbatim() {
        let dir = TempDir::new().unwrap();
        let rasterizer = MockRasterizer::new(10, 10);
        let handler = handler(rasterizer.clone(), &dir, ExportSettings::default());

        let receipt = handler.handle_markdown(command()).await.unwrap();

        assert_eq!(receipt.filename, "Async_feedback_platform_2025-03-09.md");
        assert_eq!(receipt.page_count, None);
        assert_eq!(
            std::fs::read_to_string(&receipt.location).unwrap(),
            "## Competitive Landscape"
        );
        assert_eq!(rasterizer.call_count(), 0);
    }
}

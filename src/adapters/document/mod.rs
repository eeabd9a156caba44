//! Document adapters - Implementations for the export pipeline ports.
//!
//! - `HtmlSnapshotRasterizer` - Renders results to HTML and snapshots them
//! - `LopdfPageAssembler` - Builds image-only PDFs from a page plan
//! - `LocalArtifactStore` - Saves artifacts atomically on the filesystem
//! - `MockRasterizer` - Deterministic fixed-size rasters for tests

mod html_snapshot_rasterizer;
mod local_artifact_store;
mod lopdf_page_assembler;
mod mock_rasterizer;

pub use html_snapshot_rasterizer::HtmlSnapshotRasterizer;
pub use local_artifact_store::LocalArtifactStore;
pub use lopdf_page_assembler::LopdfPageAssembler;
pub use mock_rasterizer::MockRasterizer;

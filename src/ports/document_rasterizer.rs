//! Document Rasterizer Port - Snapshot of the rendered result document.
//!
//! Rasterization is the only place the export pipeline touches the
//! presentation layer. Keeping it behind a trait lets tests substitute a
//! renderer that produces deterministic fixed-size images.

use async_trait::async_trait;
use image::RgbaImage;

use super::ExportError;
use crate::domain::research::AnalysisResult;

/// Port for rasterizing a rendered analysis document.
#[async_trait]
pub trait DocumentRasterizer: Send + Sync {
    /// Renders `document` into one tall image at `scale` times the
    /// renderer's base pixel density.
    async fn rasterize(
        &self,
        document: &AnalysisResult,
        scale: f32,
    ) -> Result<RasterImage, ExportError>;
}

/// A single tall raster of the rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage(RgbaImage);

impl RasterImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self(pixels)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.0
    }
}

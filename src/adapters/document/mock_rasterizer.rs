//! Mock Rasterizer for testing.
//!
//! Produces deterministic solid images of a fixed base size multiplied by
//! the requested scale, so page counts in tests are exact. A gate can hold
//! calls open until released.

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::domain::foundation::ResearchId;
use crate::domain::research::AnalysisResult;
use crate::ports::{DocumentRasterizer, ExportError, RasterImage};

/// Mock rasterizer for testing.
#[derive(Debug, Clone)]
pub struct MockRasterizer {
    base_width: u32,
    base_height: u32,
    error: Arc<Mutex<Option<ExportError>>>,
    calls: Arc<Mutex<Vec<(ResearchId, f32)>>>,
    gate: Option<Arc<Notify>>,
}

impl MockRasterizer {
    /// Creates a rasterizer whose output at scale 1.0 is `width` x `height`.
    pub fn new(base_width: u32, base_height: u32) -> Self {
        Self {
            base_width,
            base_height,
            error: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Fails every call with `error`.
    pub fn with_error(self, error: ExportError) -> Self {
        *self.error.lock().unwrap() = Some(error);
        self
    }

    /// Holds every call open until [`release`](Self::release) is called.
    pub fn with_gate(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Lets one gated call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of rasterize calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Document ids and scales of all calls.
    pub fn get_calls(&self) -> Vec<(ResearchId, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRasterizer for MockRasterizer {
    async fn rasterize(
        &self,
        document: &AnalysisResult,
        scale: f32,
    ) -> Result<RasterImage, ExportError> {
        self.calls
            .lock()
            .unwrap()
            .push((document.id().clone(), scale));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }

        let width = (self.base_width as f32 * scale).round() as u32;
        let height = (self.base_height as f32 * scale).round() as u32;
        Ok(RasterImage::new(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::research::ProductIdea;

    fn result() -> AnalysisResult {
        AnalysisResult::new(
            ResearchId::new("r-1"),
            Timestamp::now(),
            ProductIdea::new("Idea", "Users", vec![]),
            "Body",
        )
    }

    #[tokio::test]
    async fn scales_base_size() {
        let rasterizer = MockRasterizer::new(420, 300);
        let image = rasterizer.rasterize(&result(), 2.0).await.unwrap();
        assert_eq!((image.width(), image.height()), (840, 600));
        assert_eq!(rasterizer.get_calls(), vec![(ResearchId::new("r-1"), 2.0)]);
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let rasterizer =
            MockRasterizer::new(10, 10).with_error(ExportError::rasterization_failed("boom"));
        assert!(rasterizer.rasterize(&result(), 1.0).await.is_err());
        assert_eq!(rasterizer.call_count(), 1);
    }
}

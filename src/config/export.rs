//! Document export configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{ExportSettings, DEFAULT_EXPORT_SCALE};
use crate::domain::export::TailPolicy;

/// Document export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory exported artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Rasterization density multiplier
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// HTML-to-image renderer executable
    #[serde(default = "default_renderer_command")]
    pub renderer_command: String,

    /// Renderer viewport width in CSS pixels
    #[serde(default = "default_viewport_width")]
    pub viewport_width_px: u32,

    /// Renderer timeout in seconds; unset lets the renderer run to completion
    #[serde(default)]
    pub renderer_timeout_secs: Option<u64>,

    /// Emit a trailing page when the image ends exactly on a page boundary
    #[serde(default)]
    pub zero_remainder_page: bool,
}

impl ExportConfig {
    /// Get the renderer timeout as Duration
    pub fn renderer_timeout(&self) -> Option<Duration> {
        self.renderer_timeout_secs.map(Duration::from_secs)
    }

    /// Pipeline settings for the export handler
    pub fn settings(&self) -> ExportSettings {
        let policy = if self.zero_remainder_page {
            TailPolicy::EmitZeroRemainderPage
        } else {
            TailPolicy::SkipEmptyTail
        };
        ExportSettings::default()
            .with_scale(self.scale)
            .with_tail_policy(policy)
    }

    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ValidationError::InvalidScale);
        }
        if self.renderer_command.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EXPORT__RENDERER_COMMAND"));
        }
        if self.viewport_width_px == 0 {
            return Err(ValidationError::InvalidViewport);
        }
        if self.renderer_timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            scale: default_scale(),
            renderer_command: default_renderer_command(),
            viewport_width_px: default_viewport_width(),
            renderer_timeout_secs: None,
            zero_remainder_page: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_scale() -> f32 {
    DEFAULT_EXPORT_SCALE
}

fn default_renderer_command() -> String {
    "wkhtmltoimage".to_string()
}

fn default_viewport_width() -> u32 {
    1024
}

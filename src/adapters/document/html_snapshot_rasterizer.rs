//! HTML Snapshot Rasterizer - Implementation of DocumentRasterizer.
//!
//! Renders the analysis result to a styled HTML page with pulldown-cmark and
//! snapshots it with an external HTML-to-image renderer (`wkhtmltoimage` by
//! default). The renderer reads HTML on stdin and writes PNG on stdout.
//!
//! # Example
//!
//! ```rust,ignore
//! let rasterizer = HtmlSnapshotRasterizer::new().with_viewport_width(1024);
//! let image = rasterizer.rasterize(&result, 2.0).await?;
//! ```

use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::research::AnalysisResult;
use crate::ports::{DocumentRasterizer, ExportError, RasterImage};

/// Rasterizer that snapshots rendered HTML through an external command.
#[derive(Debug, Clone)]
pub struct HtmlSnapshotRasterizer {
    /// Renderer executable, resolved through PATH when not absolute.
    command: String,

    /// CSS viewport width in pixels before scaling.
    viewport_width_px: u32,

    /// Limit for one snapshot, covering the input write and the wait.
    /// `None` lets the renderer run to completion.
    timeout: Option<Duration>,
}

impl Default for HtmlSnapshotRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSnapshotRasterizer {
    /// Create a rasterizer with default settings.
    pub fn new() -> Self {
        Self {
            command: "wkhtmltoimage".to_string(),
            viewport_width_px: 1024,
            timeout: None,
        }
    }

    /// Set a custom renderer executable.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Set the viewport width in CSS pixels.
    pub fn with_viewport_width(mut self, width_px: u32) -> Self {
        self.viewport_width_px = width_px;
        self
    }

    /// Set the snapshot timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check if the renderer is installed and accessible.
    pub async fn is_available(&self) -> bool {
        let output = Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        output.map(|o| o.status.success()).unwrap_or(false)
    }

    async fn snapshot(&self, page: &str, scale: f32) -> Result<Vec<u8>, ExportError> {
        let width = self.viewport_width_px.to_string();
        let zoom = scale.to_string();
        let mut child = Command::new(&self.command)
            .args([
                "--quiet",
                "--format",
                "png",
                "--width",
                width.as_str(),
                "--zoom",
                zoom.as_str(),
                "-",
                "-",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExportError::renderer_unavailable(format!(
                    "Failed to start {}: {}",
                    self.command, e
                ))
            })?;

        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(page.as_bytes()).await.map_err(|e| {
                    ExportError::rasterization_failed(format!(
                        "Failed to write to renderer: {}",
                        e
                    ))
                })?;
            }
            child.wait_with_output().await.map_err(|e| {
                ExportError::rasterization_failed(format!("Renderer failed: {}", e))
            })
        };

        // Dropping `run` on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| {
                ExportError::rasterization_failed(format!(
                    "Renderer timed out after {}ms",
                    limit.as_millis()
                ))
            })??,
            None => run.await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::rasterization_failed(format!(
                "Renderer returned error: {}",
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl DocumentRasterizer for HtmlSnapshotRasterizer {
    async fn rasterize(
        &self,
        document: &AnalysisResult,
        scale: f32,
    ) -> Result<RasterImage, ExportError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ExportError::rasterization_failed(format!(
                "Invalid scale factor {}",
                scale
            )));
        }

        let page = render_page(document);
        let png = self.snapshot(&page, scale).await?;

        let pixels = image::load_from_memory(&png)
            .map_err(|e| ExportError::rasterization_failed(format!("Invalid snapshot: {}", e)))?
            .to_rgba8();

        tracing::debug!(
            research_id = %document.id(),
            width = pixels.width(),
            height = pixels.height(),
            "Rasterized document"
        );
        Ok(RasterImage::new(pixels))
    }
}

/// Renders the result as a standalone HTML page: an idea summary header
/// followed by the markdown body.
fn render_page(document: &AnalysisResult) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut body = String::new();
    html::push_html(&mut body, Parser::new_ext(document.body(), options));

    let idea = document.product_idea();
    let features: String = idea
        .core_features
        .iter()
        .map(|f| format!("<li>{}</li>", html_escape(f)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <header class="idea-summary">
        <h1>{title}</h1>
        <p><strong>Target user:</strong> {target_user}</p>
        <ul class="features">{features}</ul>
        <p class="generated">Generated {date}</p>
    </header>
    <article class="analysis">
{body}
    </article>
</body>
</html>"#,
        title = html_escape(&idea.title),
        target_user = html_escape(&idea.target_user),
        features = features,
        date = document.timestamp().date(),
        css = PAGE_CSS,
        body = body
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_CSS: &str = r#"
body {
    font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
    color: #1f2937;
    background: #ffffff;
    margin: 0;
    padding: 32px 40px;
    line-height: 1.6;
}
.idea-summary {
    border-bottom: 2px solid #2563eb;
    margin-bottom: 24px;
    padding-bottom: 12px;
}
.idea-summary h1 { margin: 0 0 8px 0; color: #2563eb; }
.generated { color: #6b7280; font-size: 0.9em; }
table { border-collapse: collapse; width: 100%; margin: 16px 0; }
th, td { border: 1px solid #e5e7eb; padding: 6px 10px; text-align: left; }
th { background: #f3f4f6; }
code { background: #f3f4f6; padding: 1px 4px; border-radius: 3px; }
blockquote { border-left: 4px solid #e5e7eb; margin-left: 0; padding-left: 16px; color: #6b7280; }
"#;

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ResearchId, Timestamp};
    use crate::domain::research::ProductIdea;
    use chrono::{TimeZone, Utc};

    fn result_with_body(body: &str) -> AnalysisResult {
        AnalysisResult::new(
            ResearchId::new("r-1"),
            Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap()),
            ProductIdea::new(
                "Plant <Care> App",
                "Busy plant owners",
                vec!["Watering reminders".to_string(), "Light & soil tips".to_string()],
            ),
            body,
        )
    }

    // ───────────────────────────────────────────────────────────────
    // Page rendering
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn page_contains_idea_summary() {
        let page = render_page(&result_with_body("Body"));
        assert!(page.contains("<h1>Plant &lt;Care&gt; App</h1>"));
        assert!(page.contains("Busy plant owners"));
        assert!(page.contains("<li>Watering reminders</li>"));
        assert!(page.contains("<li>Light &amp; soil tips</li>"));
        assert!(page.contains("Generated 2025-03-09"));
    }

    #[test]
    fn page_renders_markdown_body() {
        let page = render_page(&result_with_body(
            "## Competitors\n\n| Name | Price |\n|------|-------|\n| A | $5 |\n\n- [x] done",
        ));
        assert!(page.contains("<h2>Competitors</h2>"));
        assert!(page.contains("<table>"));
        assert!(page.contains("<td>A</td>"));
        assert!(page.contains("checkbox"));
    }

    #[test]
    fn html_escape_escapes_special_chars() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    // ───────────────────────────────────────────────────────────────
    // Renderer process
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn builder_sets_options() {
        let rasterizer = HtmlSnapshotRasterizer::new()
            .with_command("/opt/bin/renderer")
            .with_viewport_width(800)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(rasterizer.command, "/opt/bin/renderer");
        assert_eq!(rasterizer.viewport_width_px, 800);
        assert_eq!(rasterizer.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn no_timeout_by_default() {
        assert_eq!(HtmlSnapshotRasterizer::new().timeout, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_covers_renderer_that_never_reads_input() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("stalled-renderer");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let rasterizer = HtmlSnapshotRasterizer::new()
            .with_command(script.to_string_lossy())
            .with_timeout(Duration::from_millis(300));
        // Larger than a pipe buffer, so the write blocks until the timeout.
        let body = "x".repeat(1024 * 1024);

        let started = std::time::Instant::now();
        let err = rasterizer
            .rasterize(&result_with_body(&body), 1.0)
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(10));
        match err {
            ExportError::RasterizationFailed(reason) => assert!(reason.contains("timed out")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_renderer_is_not_available() {
        let rasterizer =
            HtmlSnapshotRasterizer::new().with_command("definitely-not-a-renderer-xyz");
        assert!(!rasterizer.is_available().await);
    }

    #[tokio::test]
    async fn missing_renderer_fails_with_renderer_unavailable() {
        let rasterizer =
            HtmlSnapshotRasterizer::new().with_command("definitely-not-a-renderer-xyz");
        let err = rasterizer
            .rasterize(&result_with_body("Body"), 2.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::RendererUnavailable(_)));
    }

    #[tokio::test]
    async fn rejects_non_positive_scale() {
        let rasterizer = HtmlSnapshotRasterizer::new();
        let err = rasterizer
            .rasterize(&result_with_body("Body"), 0.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::RasterizationFailed(_)));
    }
}

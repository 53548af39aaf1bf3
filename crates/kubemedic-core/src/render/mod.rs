//! Report renderers.
//!
//! A [`RendererRegistry`] maps format names to [`Renderer`] implementations.
//! It is built once at startup; [`RendererRegistry::with_defaults`] registers
//! `json` and `text`. Asking for a name that is not registered fails with
//! the list of supported names.

pub mod json;
pub mod text;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::{AnalysisReport, RenderError};
use crate::metrics::METRICS;
use crate::obs;

pub use json::{JsonOutput, JsonRenderer};
pub use text::TextRenderer;

/// Caller-supplied presentation flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// One line per failure, no headers (text only).
    pub compact: bool,
    /// ANSI colours on verbose text output.
    pub color: bool,
}

impl RenderOptions {
    pub fn compact() -> Self {
        Self {
            compact: true,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Converts a report into one output encoding.
pub trait Renderer: Send + Sync {
    fn render(&self, report: &AnalysisReport, options: &RenderOptions)
        -> Result<Vec<u8>, RenderError>;
}

/// Named renderers, ordered by name.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: BTreeMap<String, Box<dyn Renderer>>,
}

impl RendererRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `json` and `text` renderers. The text
    /// renderer appends failures to the error log at `error_log_path`.
    pub fn with_defaults(error_log_path: impl Into<PathBuf>) -> Self {
        Self::new()
            .with_renderer(json::FORMAT, JsonRenderer)
            .with_renderer(text::FORMAT, TextRenderer::new(error_log_path))
    }

    /// Add or replace a renderer.
    pub fn with_renderer(
        mut self,
        name: impl Into<String>,
        renderer: impl Renderer + 'static,
    ) -> Self {
        self.register(name, renderer);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, renderer: impl Renderer + 'static) {
        self.renderers.insert(name.into(), Box::new(renderer));
    }

    /// Supported format names, sorted.
    pub fn formats(&self) -> Vec<&str> {
        self.renderers.keys().map(String::as_str).collect()
    }

    pub fn supports(&self, format: &str) -> bool {
        self.renderers.contains_key(format)
    }

    /// Render `report` with the renderer registered under `format`.
    pub fn render(
        &self,
        report: &AnalysisReport,
        format: &str,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let renderer =
            self.renderers
                .get(format)
                .ok_or_else(|| RenderError::UnsupportedFormat {
                    format: format.to_string(),
                    available: self.formats().join(", "),
                })?;

        let output = renderer.render(report, options)?;
        METRICS.inc_renders();
        obs::emit_render_finished(
            format,
            report.results.len(),
            report.problem_count(),
            output.len(),
        );
        Ok(output)
    }
}

//! Structured observability hooks for the resolution and reporting pipeline.
//!
//! This module provides:
//! - Analysis-scoped tracing spans via the `AnalysisSpan` RAII guard
//! - Emission functions for pipeline events: knowledge-base load, resolution,
//!   template failures, error-log writes and render completion
//!
//! Filter with `RUST_LOG`; pass `json = true` to [`crate::init_tracing`] for
//! JSON lines.

use std::path::Path;

use tracing::{debug, info, warn};

/// RAII guard that enters an analysis-scoped span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = AnalysisSpan::enter("payments", "openai");
/// // Every event emitted below carries namespace and provider.
/// ```
pub struct AnalysisSpan {
    _span: tracing::span::EnteredSpan,
}

impl AnalysisSpan {
    /// Create and enter a span tagged with the namespace and provider.
    pub fn enter(namespace: &str, provider: &str) -> Self {
        Self {
            _span: analysis_span(namespace, provider).entered(),
        }
    }
}

/// Span for one analysis. Use with `tracing::Instrument` across `.await`.
pub fn analysis_span(namespace: &str, provider: &str) -> tracing::Span {
    tracing::info_span!(
        "kubemedic.analysis",
        namespace = %namespace,
        provider = %provider,
    )
}

/// Emit event: one knowledge-base entry compiled.
///
/// # Example
///
/// ```ignore
/// emit_kb_entry_loaded("CrashLoopBackOff", "crashloop.txt");
/// // logs: event=kb.entry_loaded pattern=CrashLoopBackOff file=crashloop.txt
/// ```
pub fn emit_kb_entry_loaded(pattern: &str, file: &str) {
    info!(event = "kb.entry_loaded", pattern = %pattern, file = %file);
}

/// Emit event: knowledge base ready for use.
pub fn emit_kb_loaded(dir: &Path, entries: usize) {
    info!(event = "kb.loaded", dir = %dir.display(), entries = entries);
}

/// Emit event: a result's failure matched a knowledge-base entry.
pub fn emit_resolution_matched(result_name: &str, failure_text: &str, file: &str) {
    debug!(
        event = "resolution.matched",
        result = %result_name,
        text = %failure_text,
        file = %file,
    );
}

/// Emit event: no entry matched the failure considered for resolution.
pub fn emit_resolution_missed(result_name: &str, failure_text: &str) {
    debug!(event = "resolution.missed", result = %result_name, text = %failure_text);
}

/// Emit event: a matched template could not be read (warning level).
pub fn emit_template_read_failed(path: &Path, error: &dyn std::fmt::Display) {
    warn!(event = "resolution.template_read_failed", path = %path.display(), error = %error);
}

/// Emit event: a line could not be appended to the error log (warning level).
pub fn emit_error_log_write_failed(path: &Path, error: &dyn std::fmt::Display) {
    warn!(event = "error_log.write_failed", path = %path.display(), error = %error);
}

/// Emit event: a report was rendered.
pub fn emit_render_finished(format: &str, results: usize, problems: usize, bytes: usize) {
    info!(
        event = "render.finished",
        format = %format,
        results = results,
        problems = problems,
        bytes = bytes,
    );
}

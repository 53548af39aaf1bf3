//! Human-readable (`text`) renderer.
//!
//! Two presentation modes. Verbose mode prints a header per result, an
//! `Error:` line per failure and the remediation body. Compact mode prints
//! one `<namespace>, <kind> <resource> : <text>` line per failure.
//!
//! Every rendered failure text is also appended to the persistent error log,
//! whatever the mode. The log is opened before any output is produced and a
//! failure to open it aborts the render.

use std::path::{Path, PathBuf};

use colored::{Color, Colorize};

use super::{RenderOptions, Renderer};
use crate::domain::{AnalysisReport, DiagnosticResult, RenderError};
use crate::error_log::ErrorLog;

pub const FORMAT: &str = "text";

const SEPARATOR: &str =
    "------------------------------------------------------------------------------------";

/// Width of the marker every remediation template starts with. It is not
/// part of the displayed body.
pub const REMEDIATION_MARKER_WIDTH: usize = 7;

pub const NO_PROBLEMS: &str = "No problems detected";

#[derive(Debug, Clone)]
pub struct TextRenderer {
    error_log_path: PathBuf,
}

impl TextRenderer {
    pub fn new(error_log_path: impl Into<PathBuf>) -> Self {
        Self {
            error_log_path: error_log_path.into(),
        }
    }

    pub fn error_log_path(&self) -> &Path {
        &self.error_log_path
    }
}

impl Renderer for TextRenderer {
    fn render(
        &self,
        report: &AnalysisReport,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let mut log = ErrorLog::open(&self.error_log_path)?;
        Ok(render_text(report, options, &mut log).into_bytes())
    }
}

fn render_text(report: &AnalysisReport, options: &RenderOptions, log: &mut ErrorLog) -> String {
    let paint = Painter(options.color);
    let mut out = String::new();

    if !report.warnings.is_empty() {
        out.push('\n');
        out.push_str(&paint.apply("Warnings : ", Color::Yellow));
        out.push('\n');
        for warning in &report.warnings {
            out.push_str(&format!("- {}\n", paint.apply(warning, Color::Yellow)));
        }
    }

    if !options.compact {
        out.push('\n');
    }

    if report.results.is_empty() {
        if !options.compact {
            out.push_str(&paint.apply(NO_PROBLEMS, Color::Green));
            out.push('\n');
        }
        return out;
    }

    for (n, result) in report.results.iter().enumerate() {
        if !options.compact {
            out.push_str(&format!(
                "\n{}\n{} Resource: {}, Parent: {}\n",
                SEPARATOR,
                paint.apply(&n.to_string(), Color::Cyan),
                paint.apply(result.name(), Color::Yellow),
                paint.apply(&result.parent_object, Color::Cyan),
            ));
        }

        render_failures(&mut out, result, options, &paint, log);

        if let Some(body) = remediation_body(result.details()) {
            out.push('\n');
            out.push_str(&paint.apply(body, Color::Green));
            out.push('\n');
        }
    }

    out
}

fn render_failures(
    out: &mut String,
    result: &DiagnosticResult,
    options: &RenderOptions,
    paint: &Painter,
    log: &mut ErrorLog,
) {
    for failure in &result.failures {
        log.append(&failure.text);

        if options.compact {
            out.push_str(&format!(
                "{}, {} {} : {}\n",
                result.namespace(),
                result.kind,
                result.resource_name(),
                failure.text
            ));
            continue;
        }

        out.push_str(&format!(
            "\n{} {}\n",
            paint.apply("Error:", Color::Red),
            paint.apply(&failure.text, Color::Red)
        ));
        if failure.has_doc() {
            out.push_str(&format!(
                "  {} {}\n",
                paint.apply("Kubernetes Doc:", Color::Red),
                paint.apply(&failure.doc_link, Color::Red)
            ));
        }
    }
}

/// Displayed part of a remediation body: everything after the leading
/// marker when the body is longer than the marker, otherwise the body as is.
/// `None` for an empty body.
pub fn remediation_body(details: &str) -> Option<&str> {
    if details.is_empty() {
        return None;
    }
    match details.char_indices().nth(REMEDIATION_MARKER_WIDTH) {
        Some((offset, _)) => Some(&details[offset..]),
        None => Some(details),
    }
}

struct Painter(bool);

impl Painter {
    fn apply(&self, text: &str, color: Color) -> String {
        if self.0 {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

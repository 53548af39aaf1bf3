//! Structured (`json`) renderer.

use serde::Serialize;

use super::{RenderOptions, Renderer};
use crate::domain::{classify, AnalysisReport, AnalysisStatus, DiagnosticResult, RenderError};

pub const FORMAT: &str = "json";

/// Wire shape of the structured report.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    pub provider: &'a str,
    pub problems: usize,
    pub results: &'a [DiagnosticResult],
    pub errors: &'a [String],
    pub status: AnalysisStatus,
}

impl<'a> JsonOutput<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        let (status, problems) = classify(&report.results);
        Self {
            provider: &report.provider,
            problems,
            results: &report.results,
            errors: &report.warnings,
            status,
        }
    }
}

/// Pretty-printed JSON, two-space indent.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(
        &self,
        report: &AnalysisReport,
        _options: &RenderOptions,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec_pretty(&JsonOutput::new(report))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Failure;
    use serde_json::{json, Value};

    #[test]
    fn test_schema_has_expected_keys() {
        let report = AnalysisReport::new("openai").with_results(vec![DiagnosticResult::new(
            "Pod",
            "ns1",
            "pod-a",
            vec![Failure::new("a"), Failure::new("b")],
        )]);
        let raw = JsonRenderer
            .render(&report, &RenderOptions::default())
            .unwrap();
        let v: Value = serde_json::from_slice(&raw).unwrap();
        let obj = v.as_object().unwrap();
        for key in ["provider", "problems", "results", "errors", "status"] {
            assert!(obj.contains_key(key), "missing key: {}", key);
        }
        assert_eq!(v["provider"], json!("openai"));
        assert_eq!(v["problems"], json!(2));
        assert_eq!(v["status"], json!("ProblemDetected"));
        assert_eq!(v["errors"], json!([]));
    }

    #[test]
    fn test_empty_report_is_ok() {
        let raw = JsonRenderer
            .render(&AnalysisReport::default(), &RenderOptions::default())
            .unwrap();
        let v: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(v["status"], json!("OK"));
        assert_eq!(v["problems"], json!(0));
        assert_eq!(v["results"], json!([]));
    }

    #[test]
    fn test_pretty_printed() {
        let raw = JsonRenderer
            .render(&AnalysisReport::default(), &RenderOptions::default())
            .unwrap();
        let text = String::from_utf8(raw).unwrap();
        assert!(text.starts_with("{\n  \"provider\""));
    }
}

//! Aggregate analysis report and health classification.

use serde::{Deserialize, Serialize};

use crate::domain::result::DiagnosticResult;
use crate::resolution::Resolver;

/// Aggregate health of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "OK")]
    Ok,
    ProblemDetected,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::ProblemDetected => "ProblemDetected",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a result set.
///
/// The problem count is the number of failures across all results, not the
/// number of results. Any failure at all means `ProblemDetected`.
pub fn classify(results: &[DiagnosticResult]) -> (AnalysisStatus, usize) {
    let problems: usize = results.iter().map(|r| r.failures.len()).sum();
    let status = if problems > 0 {
        AnalysisStatus::ProblemDetected
    } else {
        AnalysisStatus::Ok
    };
    (status, problems)
}

/// Output of one analysis invocation.
///
/// Created per analysis, mutated in place while results and resolutions are
/// computed, then handed to a single render call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Explanation backend identifier; may be empty.
    pub provider: String,
    pub results: Vec<DiagnosticResult>,
    /// Non-fatal issues met during analysis, rendered inline.
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            results: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_results(mut self, results: Vec<DiagnosticResult>) -> Self {
        self.results = results;
        self
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Run the resolver over every result in order, replacing each with its
    /// resolved value. Template read failures become report warnings.
    pub fn resolve_all(&mut self, resolver: &Resolver<'_>) {
        let results = std::mem::take(&mut self.results);
        self.results.reserve(results.len());
        for result in results {
            let resolved = resolver.resolve(result);
            if let Some(warning) = resolved.warning {
                self.warnings.push(warning.to_string());
            }
            self.results.push(resolved.result);
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        classify(&self.results).0
    }

    pub fn problem_count(&self) -> usize {
        classify(&self.results).1
    }
}

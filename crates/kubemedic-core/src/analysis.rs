//! Analyzer collaborator interface and the analysis run.
//!
//! Analyzers inspect one resource kind each and produce
//! [`DiagnosticResult`]s. They must fill in `kind`, `namespace`,
//! `resource_name` and an ordered failure list (see
//! [`DiagnosticResult::new`]). An [`Analysis`] runs the selected analyzers in
//! registration order and collects their output into a fresh
//! [`AnalysisReport`].

use async_trait::async_trait;
use tracing::{debug, Instrument};

use crate::domain::{AnalysisError, AnalysisReport, DiagnosticResult};
use crate::obs;

/// What an analysis run should look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisScope {
    /// Namespace to inspect; empty means all namespaces.
    pub namespace: String,
    /// Analyzer names to run; empty means every registered analyzer.
    pub filters: Vec<String>,
}

impl AnalysisScope {
    pub fn namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, analyzer: impl Into<String>) -> Self {
        self.filters.push(analyzer.into());
        self
    }

    /// Whether `namespace` falls inside this scope.
    pub fn includes_namespace(&self, namespace: &str) -> bool {
        self.namespace.is_empty() || self.namespace == namespace
    }
}

/// Produces diagnostic results for one resource kind.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Name used for filtering, usually the resource kind.
    fn name(&self) -> &str;

    async fn analyze(&self, scope: &AnalysisScope) -> anyhow::Result<Vec<DiagnosticResult>>;
}

/// A set of analyzers plus the explanation provider recorded on reports.
pub struct Analysis {
    provider: String,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Analysis {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            analyzers: Vec::new(),
        }
    }

    pub fn with_analyzer(mut self, analyzer: impl Analyzer + 'static) -> Self {
        self.analyzers.push(Box::new(analyzer));
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn analyzer_names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Run the analyzers selected by `scope`.
    ///
    /// Filter names that match no analyzer become report warnings. The first
    /// analyzer error aborts the run.
    pub async fn run(&self, scope: &AnalysisScope) -> Result<AnalysisReport, AnalysisError> {
        let span = obs::analysis_span(&scope.namespace, &self.provider);
        self.run_inner(scope).instrument(span).await
    }

    async fn run_inner(&self, scope: &AnalysisScope) -> Result<AnalysisReport, AnalysisError> {
        let mut report = AnalysisReport::new(self.provider.clone());

        for filter in &scope.filters {
            if !self.analyzers.iter().any(|a| a.name() == filter) {
                report.push_warning(format!("analyzer {} is not registered", filter));
            }
        }

        for analyzer in self.selected(scope) {
            let results =
                analyzer
                    .analyze(scope)
                    .await
                    .map_err(|source| AnalysisError::Upstream {
                        analyzer: analyzer.name().to_string(),
                        source,
                    })?;
            debug!(analyzer = %analyzer.name(), results = results.len(), "analyzer finished");
            report.results.extend(results);
        }

        Ok(report)
    }

    fn selected<'a>(&'a self, scope: &'a AnalysisScope) -> impl Iterator<Item = &'a dyn Analyzer> {
        self.analyzers
            .iter()
            .map(|a| &**a)
            .filter(move |a| {
                scope.filters.is_empty() || scope.filters.iter().any(|f| f == a.name())
            })
    }
}

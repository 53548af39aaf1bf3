//! kubemedic core library
//!
//! Remediation lookup and report rendering for Kubernetes diagnostics:
//! - [`KnowledgeBase`]: ordered `(pattern, template)` table loaded from disk
//! - [`Resolver`]: attaches remediation text to [`DiagnosticResult`]s
//! - [`RendererRegistry`]: turns an [`AnalysisReport`] into `json` or `text`
//! - [`Analysis`]: runs pluggable [`Analyzer`]s to build a report

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error_log;
pub mod knowledge_base;
pub mod metrics;
pub mod obs;
pub mod render;
pub mod resolution;
pub mod telemetry;

pub use analysis::{Analysis, AnalysisScope, Analyzer};
pub use config::MedicConfig;
pub use domain::{
    classify, AnalysisError, AnalysisReport, AnalysisStatus, DiagnosticResult, Failure,
    KnowledgeBaseError, MedicError, RenderError, Result, Sensitive, TemplateReadError,
    SYNTHETIC_KIND,
};
pub use error_log::ErrorLog;
pub use knowledge_base::{IndexRecord, KnowledgeBase, KnowledgeBaseEntry};
pub use render::{JsonRenderer, RenderOptions, Renderer, RendererRegistry, TextRenderer};
pub use resolution::{substitute_placeholders, Resolved, ResolutionPolicy, Resolver};

pub use metrics::METRICS;
pub use obs::AnalysisSpan;
pub use telemetry::init_tracing;

/// kubemedic version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

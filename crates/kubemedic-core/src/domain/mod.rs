//! Domain models for kubemedic.
//!
//! Canonical definitions for the core entities:
//! - `DiagnosticResult`: one resource's failures plus resolution metadata
//! - `AnalysisReport`: the full output of one analysis run
//! - the pipeline error taxonomy

pub mod error;
pub mod report;
pub mod result;

// Re-export main types and errors
pub use error::{
    AnalysisError, KnowledgeBaseError, MedicError, RenderError, Result, TemplateReadError,
};
pub use report::{classify, AnalysisReport, AnalysisStatus};
pub use result::{DiagnosticResult, Failure, Sensitive, SYNTHETIC_KIND};

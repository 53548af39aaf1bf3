//! Error taxonomy for the resolution and reporting pipeline.

use std::path::PathBuf;

/// Errors produced while loading the remediation knowledge base.
///
/// Every variant is fatal to the caller: there is no partial load.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base index {path:?}: {source}")]
    ReadIndex {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse knowledge base index {path:?}: {source}")]
    ParseIndex {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid pattern {pattern:?} in index entry {index}: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A matched remediation template could not be read.
///
/// Recovered locally: the result keeps an empty remediation body and the
/// message is surfaced as a report warning.
#[derive(Debug, thiserror::Error)]
#[error("failed to read remediation template {path:?}: {source}")]
pub struct TemplateReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors that abort a render call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported output format: {format}. Available formats: {available}")]
    UnsupportedFormat { format: String, available: String },

    #[error("failed to open error log {path:?}: {source}")]
    OpenErrorLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error marshalling json: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors reported by upstream collaborators during an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analyzer {analyzer} failed: {source}")]
    Upstream {
        analyzer: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Umbrella error for the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MedicError {
    #[error(transparent)]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error(transparent)]
    TemplateRead(#[from] TemplateReadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, MedicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_lists_available() {
        let err = RenderError::UnsupportedFormat {
            format: "xml".to_string(),
            available: "json, text".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unsupported output format: xml"));
        assert!(msg.contains("json, text"));
    }

    #[test]
    fn test_invalid_pattern_error() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = KnowledgeBaseError::InvalidPattern {
            index: 2,
            pattern: "(unclosed".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("index entry 2"));
        assert!(msg.contains("(unclosed"));
    }

    #[test]
    fn test_umbrella_is_transparent() {
        let err: MedicError = AnalysisError::Upstream {
            analyzer: "Pod".to_string(),
            source: anyhow::anyhow!("list pods: forbidden"),
        }
        .into();
        assert_eq!(err.to_string(), "analyzer Pod failed: list pods: forbidden");
    }
}

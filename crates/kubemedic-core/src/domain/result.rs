//! Per-resource diagnostic results.
//!
//! A [`DiagnosticResult`] is produced by an upstream analyzer for one cluster
//! resource. The resolver later fills in the remediation body and the
//! template reference; the renderers only read it.

use serde::{Deserialize, Serialize};

/// A value that upstream analyzers may want masked before it leaves the
/// process. Carried through the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensitive {
    #[serde(rename = "Unmasked")]
    pub unmasked: String,
    #[serde(rename = "Masked")]
    pub masked: String,
}

/// One raw failure reported for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Raw failure message; the subject of knowledge-base matching.
    #[serde(rename = "Text")]
    pub text: String,

    /// Optional link to upstream Kubernetes API documentation.
    #[serde(rename = "KubernetesDoc", default)]
    pub doc_link: String,

    #[serde(rename = "Sensitive", default)]
    pub sensitive: Vec<Sensitive>,
}

impl Failure {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc_link: String::new(),
            sensitive: Vec::new(),
        }
    }

    /// Attach a documentation link.
    pub fn with_doc(mut self, doc_link: impl Into<String>) -> Self {
        self.doc_link = doc_link.into();
        self
    }

    /// Record a value pair for later masking.
    pub fn with_sensitive(
        mut self,
        unmasked: impl Into<String>,
        masked: impl Into<String>,
    ) -> Self {
        self.sensitive.push(Sensitive {
            unmasked: unmasked.into(),
            masked: masked.into(),
        });
        self
    }

    pub fn has_doc(&self) -> bool {
        !self.doc_link.is_empty()
    }
}

/// Diagnostic result for a single resource.
///
/// # Invariants
///
/// `name` is always `namespace/resource_name`. The three fields are only
/// reachable through accessors, and deserialization recomputes `name`
/// from its parts, so the invariant holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResultRecord")]
pub struct DiagnosticResult {
    /// Resource category, e.g. `Pod` or `Service`.
    pub kind: String,
    name: String,
    namespace: String,
    #[serde(rename = "resourceName")]
    resource_name: String,
    #[serde(rename = "error")]
    pub failures: Vec<Failure>,
    details: String,
    #[serde(rename = "ref")]
    resolution_ref: String,
    /// Description of the owning object, e.g. `Deployment/web`.
    #[serde(rename = "parentObject")]
    pub parent_object: String,
}

/// Kind tag used for hand-built results.
pub const SYNTHETIC_KIND: &str = "Test";

impl DiagnosticResult {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        resource_name: impl Into<String>,
        failures: Vec<Failure>,
    ) -> Self {
        let namespace = namespace.into();
        let resource_name = resource_name.into();
        Self {
            kind: kind.into(),
            name: compose_name(&namespace, &resource_name),
            namespace,
            resource_name,
            failures,
            details: String::new(),
            resolution_ref: String::new(),
            parent_object: String::new(),
        }
    }

    /// Build a one-failure result for knowledge-base authoring.
    pub fn synthetic(
        namespace: impl Into<String>,
        resource_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            SYNTHETIC_KIND,
            namespace,
            resource_name,
            vec![Failure::new(text)],
        )
    }

    pub fn with_parent_object(mut self, parent: impl Into<String>) -> Self {
        self.parent_object = parent.into();
        self
    }

    /// Composite `namespace/resource_name` identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Remediation body attached by the resolver (empty when unresolved).
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Template path of the knowledge-base entry that matched, or empty.
    pub fn resolution_ref(&self) -> &str {
        &self.resolution_ref
    }

    /// The failure that takes part in resolution, if any.
    pub fn first_failure(&self) -> Option<&Failure> {
        self.failures.first()
    }

    pub(crate) fn set_resolution(&mut self, details: String, resolution_ref: String) {
        self.details = details;
        self.resolution_ref = resolution_ref;
    }
}

fn compose_name(namespace: &str, resource_name: &str) -> String {
    format!("{}/{}", namespace, resource_name)
}

/// Wire shape accepted on input. `name` is ignored and recomputed.
#[derive(Deserialize)]
struct ResultRecord {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    namespace: String,
    #[serde(rename = "resourceName", default)]
    resource_name: String,
    #[serde(rename = "error", default)]
    failures: Vec<Failure>,
    #[serde(default)]
    details: String,
    #[serde(rename = "ref", default)]
    resolution_ref: String,
    #[serde(rename = "parentObject", default)]
    parent_object: String,
}

impl From<ResultRecord> for DiagnosticResult {
    fn from(record: ResultRecord) -> Self {
        let mut result = DiagnosticResult::new(
            record.kind,
            record.namespace,
            record.resource_name,
            record.failures,
        )
        .with_parent_object(record.parent_object);
        result.set_resolution(record.details, record.resolution_ref);
        result
    }
}

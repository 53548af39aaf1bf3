//! Resolution matcher: attaches remediation text to diagnostic results.
//!
//! For each result, one failure is tested against the knowledge base in
//! entry order using search semantics. The first entry that matches wins;
//! its template is read from disk and placeholders are substituted in a
//! fixed order:
//!
//! 1. `{{resource}}` → the result's resource name
//! 2. `{{namespace}}` → the result's namespace
//! 3. `{{1}}`..`{{N}}` → capture groups of the match (group 0 skipped)
//!
//! Placeholders without a corresponding capture group stay as written.

use regex::Captures;

use crate::domain::{DiagnosticResult, Failure, TemplateReadError};
use crate::knowledge_base::{KnowledgeBase, KnowledgeBaseEntry};
use crate::metrics::METRICS;
use crate::obs;

/// Which failure of a result takes part in resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Only the first failure is tested; later failures are never matched,
    /// even when the first one matches nothing.
    #[default]
    FirstFailure,
    /// The first failure that matches any entry is used.
    FirstMatchingFailure,
}

/// Output of resolving one result.
#[derive(Debug)]
pub struct Resolved {
    pub result: DiagnosticResult,
    /// Set when the matched template could not be read.
    pub warning: Option<TemplateReadError>,
}

/// Resolves results against a borrowed, immutable knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'kb> {
    kb: &'kb KnowledgeBase,
    policy: ResolutionPolicy,
}

impl<'kb> Resolver<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self {
            kb,
            policy: ResolutionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Resolve one result, returning the updated value.
    ///
    /// Does not look at any other result. A result with no failures, or
    /// whose considered failure matches nothing, ends up with empty
    /// details and an empty reference.
    pub fn resolve(&self, mut result: DiagnosticResult) -> Resolved {
        let matched = self.select(&result).map(|(failure, entry, captures)| {
            obs::emit_resolution_matched(result.name(), &failure.text, entry.template_path());
            (entry, capture_groups(&captures))
        });

        let Some((entry, groups)) = matched else {
            if let Some(first) = result.first_failure() {
                obs::emit_resolution_missed(result.name(), &first.text);
                METRICS.inc_resolution_misses();
            }
            result.set_resolution(String::new(), String::new());
            return Resolved {
                result,
                warning: None,
            };
        };

        let (details, warning) = match self.kb.read_template(entry) {
            Ok(template) => (
                substitute_placeholders(
                    &template,
                    result.resource_name(),
                    result.namespace(),
                    &groups,
                ),
                None,
            ),
            Err(err) => {
                obs::emit_template_read_failed(&err.path, &err);
                METRICS.inc_template_read_failures();
                (String::new(), Some(err))
            }
        };

        METRICS.inc_results_resolved();
        result.set_resolution(details, entry.template_path().to_string());
        Resolved { result, warning }
    }

    fn select<'r>(
        &self,
        result: &'r DiagnosticResult,
    ) -> Option<(&'r Failure, &'kb KnowledgeBaseEntry, Captures<'r>)> {
        match self.policy {
            ResolutionPolicy::FirstFailure => {
                let failure = result.first_failure()?;
                let (entry, caps) = self.kb.find_match(&failure.text)?;
                Some((failure, entry, caps))
            }
            ResolutionPolicy::FirstMatchingFailure => result.failures.iter().find_map(|failure| {
                self.kb
                    .find_match(&failure.text)
                    .map(|(entry, caps)| (failure, entry, caps))
            }),
        }
    }
}

/// Capture groups 1..N. A group that did not take part in the match is
/// the empty string.
fn capture_groups(captures: &Captures<'_>) -> Vec<String> {
    captures
        .iter()
        .skip(1)
        .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect()
}

/// Substitute template placeholders.
///
/// `groups[0]` replaces `{{1}}`, `groups[1]` replaces `{{2}}`, and so on.
/// Text that contains no placeholders is returned unchanged.
pub fn substitute_placeholders(
    template: &str,
    resource: &str,
    namespace: &str,
    groups: &[String],
) -> String {
    let mut text = template
        .replace("{{resource}}", resource)
        .replace("{{namespace}}", namespace);
    for (i, group) in groups.iter().enumerate() {
        text = text.replace(&format!("{{{{{}}}}}", i + 1), group);
    }
    text
}

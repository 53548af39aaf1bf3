//! Remediation knowledge base.
//!
//! An ordered table of `(pattern, template)` entries read from
//! `<dir>/index.json`:
//!
//! ```json
//! [
//!   { "pattern": "Back-off pulling image \"(.*)\"", "file": "image-pull.txt" },
//!   { "pattern": "CrashLoopBackOff", "file": "crashloop.txt" }
//! ]
//! ```
//!
//! Entries keep load order, which is also match priority. The table is
//! compiled once and is immutable afterwards, so a single instance can be
//! shared by reference across concurrent analyses.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::index_path;
use crate::domain::{KnowledgeBaseError, TemplateReadError};
use crate::metrics::METRICS;
use crate::obs;

/// One record of the on-disk index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Regular expression searched for in failure text.
    pub pattern: String,
    /// Template path relative to the knowledge-base directory.
    pub file: String,
}

/// A compiled knowledge-base entry.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseEntry {
    pattern: String,
    template_path: String,
    matcher: Regex,
}

impl KnowledgeBaseEntry {
    fn compile(index: usize, record: IndexRecord) -> Result<Self, KnowledgeBaseError> {
        let matcher =
            Regex::new(&record.pattern).map_err(|source| KnowledgeBaseError::InvalidPattern {
                index,
                pattern: record.pattern.clone(),
                source,
            })?;
        Ok(Self {
            pattern: record.pattern,
            template_path: record.file,
            matcher,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Template path as written in the index.
    pub fn template_path(&self) -> &str {
        &self.template_path
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }
}

/// Compiled, ordered, read-only knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    dir: PathBuf,
    entries: Vec<KnowledgeBaseEntry>,
}

impl KnowledgeBase {
    /// Read and compile `<dir>/index.json`.
    ///
    /// Any unreadable index, malformed JSON or invalid pattern fails the
    /// whole load.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, KnowledgeBaseError> {
        let dir = dir.as_ref();
        let path = index_path(dir);
        let raw = std::fs::read_to_string(&path).map_err(|source| KnowledgeBaseError::ReadIndex {
            path: path.clone(),
            source,
        })?;
        let records: Vec<IndexRecord> = serde_json::from_str(&raw)
            .map_err(|source| KnowledgeBaseError::ParseIndex { path, source })?;
        Self::from_records(dir, records)
    }

    /// Compile records that were obtained elsewhere. Templates are still
    /// resolved against `dir`.
    pub fn from_records(
        dir: impl Into<PathBuf>,
        records: Vec<IndexRecord>,
    ) -> Result<Self, KnowledgeBaseError> {
        let dir = dir.into();
        let mut entries = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            obs::emit_kb_entry_loaded(&record.pattern, &record.file);
            entries.push(KnowledgeBaseEntry::compile(index, record)?);
        }

        METRICS.add_kb_entries(entries.len() as u64);
        obs::emit_kb_loaded(&dir, entries.len());
        Ok(Self { dir, entries })
    }

    /// Base directory templates are resolved against.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Entries in match-priority order.
    pub fn entries(&self) -> &[KnowledgeBaseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose pattern occurs anywhere in `text`, along with the
    /// capture groups of that match.
    pub fn find_match<'kb, 't>(
        &'kb self,
        text: &'t str,
    ) -> Option<(&'kb KnowledgeBaseEntry, regex::Captures<'t>)> {
        self.entries
            .iter()
            .find_map(|entry| entry.matcher.captures(text).map(|caps| (entry, caps)))
    }

    /// Read the template body for `entry` from disk. Never cached, so
    /// templates may be edited while the process runs.
    pub fn read_template(&self, entry: &KnowledgeBaseEntry) -> Result<String, TemplateReadError> {
        let path = self.dir.join(&entry.template_path);
        std::fs::read_to_string(&path).map_err(|source| TemplateReadError { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pattern: &str, file: &str) -> IndexRecord {
        IndexRecord {
            pattern: pattern.to_string(),
            file: file.to_string(),
        }
    }

    #[test]
    fn test_from_records_keeps_order() {
        let kb = KnowledgeBase::from_records(
            "kb",
            vec![record("OOMKilled", "oom.txt"), record("Killed", "killed.txt")],
        )
        .unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.entries()[0].template_path(), "oom.txt");
        assert_eq!(kb.entries()[1].pattern(), "Killed");
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let kb = KnowledgeBase::from_records(
            "kb",
            vec![record("OOMKilled", "oom.txt"), record("Killed", "killed.txt")],
        )
        .unwrap();
        let (entry, _) = kb.find_match("container OOMKilled").unwrap();
        assert_eq!(entry.template_path(), "oom.txt");

        let (entry, _) = kb.find_match("process Killed by signal").unwrap();
        assert_eq!(entry.template_path(), "killed.txt");
    }

    #[test]
    fn test_search_semantics() {
        let kb =
            KnowledgeBase::from_records("kb", vec![record("no endpoints", "svc.txt")]).unwrap();
        assert!(kb.find_match("Service web has no endpoints, expected labels").is_some());
        assert!(kb.find_match("all endpoints ready").is_none());
    }

    #[test]
    fn test_invalid_pattern_fails_whole_load() {
        let err = KnowledgeBase::from_records(
            "kb",
            vec![record("ok", "ok.txt"), record("([unclosed", "bad.txt")],
        )
        .unwrap_err();
        match err {
            KnowledgeBaseError::InvalidPattern { index, pattern, .. } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "([unclosed");
            }
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_knowledge_base() {
        let kb = KnowledgeBase::from_records("kb", vec![]).unwrap();
        assert!(kb.is_empty());
        assert!(kb.find_match("anything").is_none());
    }
}

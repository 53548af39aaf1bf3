//! Pipeline configuration.
//!
//! Values come from the environment with fixed fallbacks; binaries may
//! override them from command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Env var naming the knowledge-base directory.
pub const RESOLVE_DIR_ENV: &str = "KUBEMEDIC_RESOLVE_DIR";
/// Env var naming the persistent error-log file.
pub const ERROR_LOG_ENV: &str = "KUBEMEDIC_ERROR_LOG";

pub const DEFAULT_RESOLVE_DIR: &str = "resolve";
pub const DEFAULT_ERROR_LOG: &str = "/tmp/kubemedic-errors.list";

/// File name of the knowledge-base index inside the resolve directory.
pub const INDEX_FILE: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicConfig {
    /// Base directory holding `index.json` and the remediation templates.
    pub resolve_dir: PathBuf,
    /// Append-only file receiving one line per rendered failure.
    pub error_log_path: PathBuf,
}

impl Default for MedicConfig {
    fn default() -> Self {
        MedicConfig {
            resolve_dir: std::env::var(RESOLVE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_RESOLVE_DIR)),
            error_log_path: std::env::var(ERROR_LOG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ERROR_LOG)),
        }
    }
}

impl MedicConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a config with explicit paths.
    pub fn new(resolve_dir: impl Into<PathBuf>, error_log_path: impl Into<PathBuf>) -> Self {
        MedicConfig {
            resolve_dir: resolve_dir.into(),
            error_log_path: error_log_path.into(),
        }
    }

    pub fn with_resolve_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resolve_dir = dir.into();
        self
    }

    pub fn with_error_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log_path = path.into();
        self
    }

    /// Full path of the knowledge-base index.
    pub fn index_path(&self) -> PathBuf {
        index_path(&self.resolve_dir)
    }
}

pub(crate) fn index_path(dir: &Path) -> PathBuf {
    dir.join(INDEX_FILE)
}

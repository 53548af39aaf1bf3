//! Global atomic counters for pipeline observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. after a render).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters. No allocations, no locking.
pub struct Metrics {
    kb_entries_loaded: AtomicU64,
    results_resolved: AtomicU64,
    resolution_misses: AtomicU64,
    template_read_failures: AtomicU64,
    failures_logged: AtomicU64,
    renders: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            kb_entries_loaded: AtomicU64::new(0),
            results_resolved: AtomicU64::new(0),
            resolution_misses: AtomicU64::new(0),
            template_read_failures: AtomicU64::new(0),
            failures_logged: AtomicU64::new(0),
            renders: AtomicU64::new(0),
        }
    }

    /// Add `n` compiled knowledge-base entries.
    pub fn add_kb_entries(&self, n: u64) {
        self.kb_entries_loaded.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "kb_entries_loaded", "counter incremented");
    }

    pub fn inc_results_resolved(&self) {
        self.results_resolved.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "results_resolved", "counter incremented");
    }

    pub fn inc_resolution_misses(&self) {
        self.resolution_misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "resolution_misses", "counter incremented");
    }

    pub fn inc_template_read_failures(&self) {
        self.template_read_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "template_read_failures", "counter incremented");
    }

    pub fn inc_failures_logged(&self) {
        self.failures_logged.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "failures_logged", "counter incremented");
    }

    pub fn inc_renders(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "renders", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a render, process exit)
    /// rather than on every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            kb_entries_loaded = self.kb_entries_loaded(),
            results_resolved = self.results_resolved(),
            resolution_misses = self.resolution_misses(),
            template_read_failures = self.template_read_failures(),
            failures_logged = self.failures_logged(),
            renders = self.renders(),
        );
    }

    pub fn kb_entries_loaded(&self) -> u64 {
        self.kb_entries_loaded.load(Ordering::Relaxed)
    }

    pub fn results_resolved(&self) -> u64 {
        self.results_resolved.load(Ordering::Relaxed)
    }

    pub fn resolution_misses(&self) -> u64 {
        self.resolution_misses.load(Ordering::Relaxed)
    }

    pub fn template_read_failures(&self) -> u64 {
        self.template_read_failures.load(Ordering::Relaxed)
    }

    pub fn failures_logged(&self) -> u64 {
        self.failures_logged.load(Ordering::Relaxed)
    }

    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.kb_entries_loaded.store(0, Ordering::Relaxed);
        self.results_resolved.store(0, Ordering::Relaxed);
        self.resolution_misses.store(0, Ordering::Relaxed);
        self.template_read_failures.store(0, Ordering::Relaxed);
        self.failures_logged.store(0, Ordering::Relaxed);
        self.renders.store(0, Ordering::Relaxed);
    }
}

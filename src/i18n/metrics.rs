//! Translation metrics and observability module.
//!
//! Counts how resolutions are served (active catalog, fallback catalog, raw
//! key) and how catalog loads fare. One instance is shared by a store and the
//! controller driving it.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for a single translation runtime.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Resolutions answered by the active-language catalog
    active_hits: AtomicUsize,

    /// Resolutions answered by the fallback catalog
    fallback_hits: AtomicUsize,

    /// Resolutions that found nothing and returned the raw key (or an empty list)
    misses: AtomicUsize,

    /// Catalog loads attempted
    loads: AtomicUsize,

    /// Catalog loads that failed or timed out
    load_failures: AtomicUsize,
}

/// Snapshot of the counters, suitable for logging as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub active_hits: usize,
    pub fallback_hits: usize,
    pub misses: usize,
    /// Percentage of resolutions answered by either catalog
    pub resolution_hit_rate: f64,
    pub loads: usize,
    pub load_failures: usize,
    /// Percentage of loads that succeeded
    pub load_success_rate: f64,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_active_hit(&self) {
        self.active_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn active_hits(&self) -> usize {
        self.active_hits.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let active = self.active_hits();
        let fallback = self.fallback_hits();
        let misses = self.misses();
        let total = active + fallback + misses;
        let resolution_hit_rate = if total > 0 {
            ((active + fallback) as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        let loads = self.loads();
        let failures = self.load_failures();
        let load_success_rate = if loads > 0 {
            (loads.saturating_sub(failures) as f64 / loads as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            active_hits: active,
            fallback_hits: fallback,
            misses,
            resolution_hit_rate,
            loads,
            load_failures: failures,
            load_success_rate,
        }
    }
}

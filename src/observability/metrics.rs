//! Process counters
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by one engine instance
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct ProcessMetrics {
    /// Outermost calls that returned a value
    processed: AtomicU64,
    /// Outermost calls that rejected their input
    rejected: AtomicU64,
    /// Outermost calls that failed on configuration
    misconfigured: AtomicU64,
    /// Non-persistent aliases removed by purges
    aliases_purged: AtomicU64,
}

impl ProcessMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_misconfigured(&self) {
        self.misconfigured.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_aliases_purged(&self, count: u64) {
        self.aliases_purged.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            misconfigured: self.misconfigured.load(Ordering::Relaxed),
            aliases_purged: self.aliases_purged.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `ProcessMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: u64,
    pub rejected: u64,
    pub misconfigured: u64,
    pub aliases_purged: u64,
}

//! In-process invocation counters

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{ResponseEnvelope, ResponseSource};

/// Counters for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Simulated invocations (always successful)
    simulated_count: AtomicU64,
    /// Live invocations with `success = true`
    live_success_count: AtomicU64,
    /// Live invocations with `success = false`
    live_failure_count: AtomicU64,
    /// Rejected unknown identifiers
    not_found_count: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a produced envelope
    pub fn observe(&self, envelope: &ResponseEnvelope) {
        let counter = match (envelope.source, envelope.success) {
            (ResponseSource::Simulated, _) => &self.simulated_count,
            (ResponseSource::Live, true) => &self.live_success_count,
            (ResponseSource::Live, false) => &self.live_failure_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_not_found(&self) {
        self.not_found_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn simulated_count(&self) -> u64 {
        self.simulated_count.load(Ordering::Relaxed)
    }

    pub fn live_success_count(&self) -> u64 {
        self.live_success_count.load(Ordering::Relaxed)
    }

    pub fn live_failure_count(&self) -> u64 {
        self.live_failure_count.load(Ordering::Relaxed)
    }

    pub fn not_found_count(&self) -> u64 {
        self.not_found_count.load(Ordering::Relaxed)
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            simulated: self.simulated_count(),
            live_success: self.live_success_count(),
            live_failure: self.live_failure_count(),
            not_found: self.not_found_count(),
        }
    }
}

/// Snapshot of dispatcher counters (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub simulated: u64,
    pub live_success: u64,
    pub live_failure: u64,
    pub not_found: u64,
}

impl MetricsSnapshot {
    /// Envelopes produced (not-found requests excluded)
    pub fn total_envelopes(&self) -> u64 {
        self.simulated + self.live_success + self.live_failure
    }
}

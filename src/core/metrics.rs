//! Pipeline metrics for observability
//!
//! Worker-side failures (sink errors, observer panics) and intentional
//! drops are never surfaced as errors to producers; these counters are the
//! side channel through which they are visible.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracking pipeline health.
///
/// `dropped_count` is the one place intentional data loss is observable:
/// under the `DropOldest` overflow policy, evicted events are counted here
/// and nowhere else. Submit never returns an error for an eviction.
#[derive(Debug)]
pub struct PipelineMetrics {
    /// Events accepted into the queue
    submitted: AtomicU64,

    /// Events fully processed by the worker (sink write + observer dispatch)
    dispatched: AtomicU64,

    /// Events evicted by the DropOldest policy
    dropped_count: AtomicU64,

    /// Times the queue was found full on submit
    queue_full_events: AtomicU64,

    /// Times a producer blocked waiting for queue space
    block_events: AtomicU64,

    /// Sink write/flush failures absorbed by the worker
    sink_errors: AtomicU64,

    /// Observer callbacks that panicked during dispatch
    observer_panics: AtomicU64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            observer_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn observer_panics(&self) -> u64 {
        self.observer_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_observer_panic(&self) -> u64 {
        self.observer_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0) of all events seen.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.submitted() as f64;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all counters to zero. Intended for tests.
    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Relaxed);
        self.dispatched.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.observer_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PipelineMetrics {
    /// Snapshot of the current counter values.
    fn clone(&self) -> Self {
        Self {
            submitted: AtomicU64::new(self.submitted()),
            dispatched: AtomicU64::new(self.dispatched()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            observer_panics: AtomicU64::new(self.observer_panics()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_at_zero() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.submitted(), 0);
        assert_eq!(metrics.dispatched(), 0);
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.block_events(), 0);
        assert_eq!(metrics.sink_errors(), 0);
        assert_eq!(metrics.observer_panics(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.record_dropped(), 0);
        assert_eq!(metrics.record_dropped(), 1);
        assert_eq!(metrics.dropped_count(), 2);
    }

    #[test]
    fn test_drop_rate() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_submitted();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "drop rate was {}", rate);
    }

    #[test]
    fn test_reset() {
        let metrics = PipelineMetrics::new();
        metrics.record_submitted();
        metrics.record_sink_error();
        metrics.reset();
        assert_eq!(metrics.submitted(), 0);
        assert_eq!(metrics.sink_errors(), 0);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let metrics = PipelineMetrics::new();
        metrics.record_submitted();

        let snapshot = metrics.clone();
        metrics.record_submitted();

        assert_eq!(snapshot.submitted(), 1);
        assert_eq!(metrics.submitted(), 2);
    }
}

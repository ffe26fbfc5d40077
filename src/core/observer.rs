//! Observer registry with condition-based dispatch
//!
//! Observers are `(Condition, callback)` pairs registered behind opaque
//! ids. The registry has a fixed maximum size so dispatch cost stays
//! predictable; exceeding it is a recoverable error, never an abort.

use super::condition::Condition;
use super::error::{PipelineError, Result};
use super::log_event::LogEvent;
use super::metrics::PipelineMetrics;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default maximum number of live registrations.
pub const DEFAULT_MAX_OBSERVERS: usize = 16;

/// Callback invoked on the worker thread for each matching event.
pub type ObserverCallback = Arc<dyn Fn(&LogEvent) + Send + Sync>;

/// Opaque handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registration {
    id: ObserverId,
    condition: Condition,
    callback: ObserverCallback,
}

/// Mapping from registration handle to `(Condition, callback)`.
///
/// Dispatch iterates live registrations in registration order, so observer
/// side effects are deterministic and test assertions on ordering hold.
pub struct ObserverRegistry {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
    max_observers: usize,
    metrics: Arc<PipelineMetrics>,
}

impl ObserverRegistry {
    pub fn new(max_observers: usize, metrics: Arc<PipelineMetrics>) -> Self {
        let max_observers = max_observers.max(1);
        Self {
            registrations: RwLock::new(Vec::with_capacity(max_observers)),
            next_id: AtomicU64::new(1),
            max_observers,
            metrics,
        }
    }

    /// Register a callback for events matching `condition`.
    ///
    /// Fails with [`PipelineError::CapacityExceeded`] once the fixed
    /// maximum is reached; the caller must unsubscribe a slot first.
    pub fn subscribe(&self, condition: Condition, callback: ObserverCallback) -> Result<ObserverId> {
        let mut registrations = self.registrations.write();
        if registrations.len() >= self.max_observers {
            return Err(PipelineError::capacity_exceeded(
                registrations.len(),
                self.max_observers,
            ));
        }
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        registrations.push(Registration {
            id,
            condition,
            callback,
        });
        Ok(id)
    }

    /// Remove one registration. Returns `false` if the id is not live;
    /// double-unsubscribe is not an error.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut registrations = self.registrations.write();
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() != before
    }

    /// Remove every registration whose condition is selected by `filter`
    /// (equal level filter; file/line/function compared where the filter
    /// sets them). Returns the number removed.
    pub fn clear_matching(&self, filter: &Condition) -> usize {
        let mut registrations = self.registrations.write();
        let before = registrations.len();
        registrations.retain(|r| !r.condition.matched_by_filter(filter));
        before - registrations.len()
    }

    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    pub fn max_observers(&self) -> usize {
        self.max_observers
    }

    /// Invoke every matching callback for `event`, in registration order.
    ///
    /// A panicking callback is caught, counted, and reported to stderr; it
    /// never takes down the worker, and never prevents later-registered
    /// observers from seeing the same event.
    pub fn dispatch(&self, event: &LogEvent) {
        // Snapshot the matching callbacks so observer code runs without
        // the registry lock held; a callback may subscribe or unsubscribe.
        let matching: Vec<(ObserverId, ObserverCallback)> = {
            let registrations = self.registrations.read();
            registrations
                .iter()
                .filter(|r| r.condition.matches(event))
                .map(|r| (r.id, Arc::clone(&r.callback)))
                .collect()
        };

        for (id, callback) in matching {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(event);
            }));
            if let Err(panic_info) = result {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                self.metrics.record_observer_panic();
                eprintln!(
                    "[PIPELINE ERROR] observer {:?} panicked: {}. \
                     Remaining observers continue to run.",
                    id, panic_msg
                );
            }
        }
    }
}

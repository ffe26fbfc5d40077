//! Bounded event queue with configurable overflow behavior
//!
//! The queue decouples arbitrarily many producer threads from the single
//! worker thread. Capacity and policy are fixed at construction; there is
//! no dynamic resize, so the memory footprint is predictable.
//!
//! Mutex-plus-condvar rather than a channel: `DropOldest` needs to evict
//! from the head on the producer side, and the consumer must be able to
//! tell "timed out" apart from "closed and empty". Neither is expressible
//! over a plain bounded channel.

use super::error::{PipelineError, Result};
use super::log_event::LogEvent;
use super::metrics::PipelineMetrics;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// What `submit` does when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Suspend the producer until space is available or the queue closes.
    ///
    /// Backpressure: producers slow to the consumer's pace in exchange for
    /// zero data loss.
    #[default]
    Block,

    /// Evict the single oldest queued event and insert the new one.
    ///
    /// Submit never blocks under this policy. Each eviction increments the
    /// `dropped_count` metric; there is no error at the submit call site.
    DropOldest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "block" => Ok(OverflowPolicy::Block),
            "drop_oldest" | "dropoldest" => Ok(OverflowPolicy::DropOldest),
            _ => Err(format!("Invalid overflow policy: '{}'", s)),
        }
    }
}

/// Consumer-side dequeue outcome.
///
/// `Closed` is authoritative: it is returned only when the queue is closed
/// *and* empty, so the worker can never mistake an idle wait for
/// termination, or termination for an idle wait.
#[derive(Debug)]
pub enum Dequeued {
    Event(LogEvent),
    TimedOut,
    Closed,
}

struct QueueState {
    items: VecDeque<LogEvent>,
    closed: bool,
}

/// Thread-safe bounded FIFO of [`LogEvent`]s.
///
/// Once closed, no new events are accepted, but events already enqueued
/// are still handed to the consumer before [`Dequeued::Closed`] is
/// reported.
pub struct BoundedQueue {
    state: Mutex<QueueState>,
    /// Signaled when an item is pushed or the queue closes (consumer side)
    item_available: Condvar,
    /// Signaled when an item is popped or the queue closes (producer side)
    space_available: Condvar,
    capacity: usize,
    policy: OverflowPolicy,
    metrics: Arc<PipelineMetrics>,
}

impl BoundedQueue {
    pub fn new(capacity: usize, policy: OverflowPolicy, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            item_available: Condvar::new(),
            space_available: Condvar::new(),
            capacity: capacity.max(1),
            policy,
            metrics,
        }
    }

    /// Enqueue an event.
    ///
    /// Fails immediately with [`PipelineError::QueueClosed`] once the queue
    /// is closed; never blocks on and never silently drops into a closed
    /// queue. On a full open queue the behavior follows the configured
    /// [`OverflowPolicy`].
    pub fn submit(&self, event: LogEvent) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PipelineError::QueueClosed);
        }

        if state.items.len() >= self.capacity {
            self.metrics.record_queue_full();
            match self.policy {
                OverflowPolicy::DropOldest => {
                    state.items.pop_front();
                    self.metrics.record_dropped();
                    self.space_available.notify_one();
                }
                OverflowPolicy::Block => {
                    self.metrics.record_block();
                    while state.items.len() >= self.capacity && !state.closed {
                        self.space_available.wait(&mut state);
                    }
                    if state.closed {
                        return Err(PipelineError::QueueClosed);
                    }
                }
            }
        }

        state.items.push_back(event);
        self.metrics.record_submitted();
        self.item_available.notify_one();
        Ok(())
    }

    /// Dequeue one event, waiting up to `timeout` for one to arrive.
    pub fn try_dequeue(&self, timeout: Duration) -> Dequeued {
        let mut state = self.state.lock();
        loop {
            if let Some(event) = state.items.pop_front() {
                self.space_available.notify_one();
                return Dequeued::Event(event);
            }
            if state.closed {
                return Dequeued::Closed;
            }
            if self
                .item_available
                .wait_for(&mut state, timeout)
                .timed_out()
            {
                // An item pushed in the race between deadline and wakeup
                // still wins over the timeout.
                if let Some(event) = state.items.pop_front() {
                    self.space_available.notify_one();
                    return Dequeued::Event(event);
                }
                return if state.closed {
                    Dequeued::Closed
                } else {
                    Dequeued::TimedOut
                };
            }
        }
    }

    /// Mark the queue closed and wake every blocked submitter and the
    /// consumer. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.item_available.notify_all();
        self.space_available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}

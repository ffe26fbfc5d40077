//! Pipeline assembly and lifecycle
//!
//! A [`Pipeline`] owns the bounded queue, the observer registry, the sink,
//! and the single worker thread. Producers call [`Pipeline::submit`] from
//! any thread; [`Pipeline::shutdown`] closes the queue, waits for the
//! worker to drain it to empty, and only then returns. No event submitted
//! before shutdown is lost, modulo the `DropOldest` policy's counted
//! evictions.

use super::condition::Condition;
use super::error::{PipelineError, Result};
use super::log_event::LogEvent;
use super::log_level::LogLevel;
use super::metrics::PipelineMetrics;
use super::observer::{ObserverCallback, ObserverId, ObserverRegistry, DEFAULT_MAX_OBSERVERS};
use super::queue::{BoundedQueue, OverflowPolicy};
use super::sink::Sink;
use super::worker::{self, StateCell, WorkerState};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Default shutdown timeout used when the pipeline is dropped without an
/// explicit `shutdown` call.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default queue capacity when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

/// Asynchronous log-event pipeline with condition-based observer dispatch.
pub struct Pipeline {
    min_level: RwLock<LogLevel>,
    queue: Arc<BoundedQueue>,
    registry: Arc<ObserverRegistry>,
    metrics: Arc<PipelineMetrics>,
    state: Arc<StateCell>,
    worker: Mutex<Option<JoinHandle<()>>>,
    done_rx: Receiver<()>,
}

impl Pipeline {
    /// Create a builder for Pipeline
    ///
    /// # Example
    /// ```
    /// use log_pipeline::prelude::*;
    ///
    /// let pipeline = Pipeline::builder()
    ///     .capacity(1024)
    ///     .overflow_policy(OverflowPolicy::Block)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Submit one event. This is the hot path: nothing is allocated here
    /// beyond what the event already carries.
    ///
    /// Events below the minimum level are discarded up front and report
    /// success. Returns [`PipelineError::QueueClosed`] once shutdown has
    /// begun; the caller should stop producing.
    pub fn submit(&self, event: LogEvent) -> Result<()> {
        if event.level < *self.min_level.read() {
            return Ok(());
        }
        self.queue.submit(event)
    }

    /// Render-and-submit convenience for plain messages.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        if level < *self.min_level.read() {
            return Ok(());
        }
        self.queue.submit(LogEvent::new(level, message))
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message)
    }

    /// Register an observer for events matching `condition`.
    pub fn subscribe(
        &self,
        condition: Condition,
        callback: ObserverCallback,
    ) -> Result<ObserverId> {
        self.registry.subscribe(condition, callback)
    }

    /// Remove one observer registration. Idempotent.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.registry.unsubscribe(id)
    }

    /// Bulk-remove registrations selected by `filter`. Returns the number
    /// removed.
    pub fn clear_matching(&self, filter: &Condition) -> usize {
        self.registry.clear_matching(filter)
    }

    pub fn observer_count(&self) -> usize {
        self.registry.len()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Current worker lifecycle state.
    pub fn worker_state(&self) -> WorkerState {
        self.state.get()
    }

    /// Pipeline metrics for observability.
    ///
    /// `metrics().dropped_count()` is the only place `DropOldest` data
    /// loss is visible.
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Number of events evicted under `DropOldest`.
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Close the queue, wait for the worker to drain every already-
    /// submitted event, then stop.
    ///
    /// Idempotent: a second call returns `Ok` immediately without
    /// re-draining. If the drain does not finish within `timeout`, returns
    /// [`PipelineError::ShutdownTimedOut`]; the worker keeps draining in
    /// the background as best-effort cleanup and a later second call still
    /// reports success.
    pub fn shutdown(&self, timeout: Duration) -> Result<()> {
        let mut worker = self.worker.lock();
        let Some(handle) = worker.take() else {
            return Ok(());
        };

        let start = Instant::now();
        self.queue.close();

        match self.done_rx.recv_timeout(timeout) {
            Ok(()) => {
                if handle.join().is_err() {
                    return Err(PipelineError::other("worker thread panicked during drain"));
                }
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => {
                // Leave the worker detached; the queue is closed, so it
                // still exits once the backlog is written.
                Err(PipelineError::shutdown_timed_out(start.elapsed()))
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Worker dropped its sender without signalling: it panicked.
                let _ = handle.join();
                Err(PipelineError::other("worker thread panicked during drain"))
            }
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        match self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
            Ok(()) => {}
            Err(PipelineError::ShutdownTimedOut { waited_ms }) => {
                eprintln!(
                    "[PIPELINE WARNING] worker did not drain within {}ms on drop. \
                     Some events may be unwritten.",
                    waited_ms
                );
            }
            Err(e) => {
                eprintln!("[PIPELINE ERROR] shutdown on drop failed: {}", e);
            }
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[PIPELINE WARNING] pipeline shut down with {} dropped events (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing a running Pipeline with a fluent API
///
/// Building *is* starting: `build()` spawns the worker thread, so a
/// pipeline can never exist half-started and a second start cannot happen.
///
/// # Example
/// ```
/// use log_pipeline::prelude::*;
///
/// let pipeline = Pipeline::builder()
///     .min_level(LogLevel::Debug)
///     .capacity(512)
///     .overflow_policy(OverflowPolicy::DropOldest)
///     .build()
///     .unwrap();
/// ```
pub struct PipelineBuilder {
    min_level: LogLevel,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    max_observers: usize,
    sink: Option<Box<dyn Sink>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            max_observers: DEFAULT_MAX_OBSERVERS,
            sink: None,
        }
    }

    /// Start from environment variables where they are set:
    /// `LOG_PIPELINE_LEVEL`, `LOG_PIPELINE_CAPACITY`,
    /// `LOG_PIPELINE_POLICY`. Unparseable values fall back to the default
    /// with a warning, so a typo in an env var never aborts startup.
    pub fn from_env() -> Self {
        let mut builder = Self::new();

        if let Ok(value) = std::env::var("LOG_PIPELINE_LEVEL") {
            match value.parse::<LogLevel>() {
                Ok(level) => builder.min_level = level,
                Err(e) => eprintln!("[PIPELINE WARNING] LOG_PIPELINE_LEVEL: {}. Using INFO.", e),
            }
        }
        if let Ok(value) = std::env::var("LOG_PIPELINE_CAPACITY") {
            match value.parse::<usize>() {
                Ok(capacity) if capacity > 0 => builder.capacity = capacity,
                _ => eprintln!(
                    "[PIPELINE WARNING] LOG_PIPELINE_CAPACITY: '{}' is not a positive \
                     integer. Using {}.",
                    value, DEFAULT_QUEUE_CAPACITY
                ),
            }
        }
        if let Ok(value) = std::env::var("LOG_PIPELINE_POLICY") {
            match value.parse::<OverflowPolicy>() {
                Ok(policy) => builder.overflow_policy = policy,
                Err(e) => eprintln!("[PIPELINE WARNING] LOG_PIPELINE_POLICY: {}. Using Block.", e),
            }
        }

        builder
    }

    /// Set minimum severity accepted by `submit`
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set the queue capacity (fixed for the pipeline's lifetime)
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the behavior when the queue is full
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set the maximum number of live observer registrations
    #[must_use = "builder methods return a new value"]
    pub fn max_observers(mut self, max: usize) -> Self {
        self.max_observers = max;
        self
    }

    /// Set the sink the worker writes to
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Build and start the pipeline.
    ///
    /// Without an explicit sink the console sink is used; if the `console`
    /// feature is disabled a sink is required.
    pub fn build(self) -> Result<Pipeline> {
        if self.capacity == 0 {
            return Err(PipelineError::config("BoundedQueue", "capacity must be non-zero"));
        }

        let sink: Box<dyn Sink> = match self.sink {
            Some(sink) => sink,
            #[cfg(feature = "console")]
            None => Box::new(crate::sinks::ConsoleSink::new()),
            #[cfg(not(feature = "console"))]
            None => {
                return Err(PipelineError::config(
                    "Pipeline",
                    "no sink configured and the console sink is not compiled in",
                ))
            }
        };

        let metrics = Arc::new(PipelineMetrics::new());
        let queue = Arc::new(BoundedQueue::new(
            self.capacity,
            self.overflow_policy,
            Arc::clone(&metrics),
        ));
        let registry = Arc::new(ObserverRegistry::new(self.max_observers, Arc::clone(&metrics)));
        let state = Arc::new(StateCell::new());
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);

        let handle = worker::spawn(
            Arc::clone(&queue),
            Arc::clone(&registry),
            sink,
            Arc::clone(&metrics),
            Arc::clone(&state),
            done_tx,
        )?;

        Ok(Pipeline {
            min_level: RwLock::new(self.min_level),
            queue,
            registry,
            metrics,
            state,
            worker: Mutex::new(Some(handle)),
            done_rx,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

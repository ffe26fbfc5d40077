//! # Log Pipeline
//!
//! An asynchronous log-event pipeline: bounded queueing between any number
//! of producer threads and a single worker thread that writes events to a
//! sink and notifies condition-matched observers.
//!
//! ## Features
//!
//! - **Bounded queue**: fixed capacity with `Block` (backpressure) or
//!   `DropOldest` (counted, bounded loss) overflow policies
//! - **Observers**: per-registration match conditions on level, source
//!   location, and message substring, dispatched in registration order
//! - **Drain-complete shutdown**: `shutdown` returns only after every
//!   already-submitted event has been written and dispatched
//! - **Isolated failures**: a failing sink write or a panicking observer
//!   is counted and reported, never fatal to the pipeline

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::core::{
        BoundedQueue, Condition, Dequeued, LevelFilter, LogEvent, LogLevel, ObserverCallback,
        ObserverId, ObserverRegistry, OverflowPolicy, Pipeline, PipelineBuilder, PipelineError,
        PipelineMetrics, RenderFormat, Renderer, Result, Sink, SourceLocation, WorkerState,
        DEFAULT_MAX_OBSERVERS, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::FileSink;
pub use crate::core::{
    BoundedQueue, Condition, Dequeued, LevelFilter, LogEvent, LogLevel, ObserverCallback,
    ObserverId, ObserverRegistry, OverflowPolicy, Pipeline, PipelineBuilder, PipelineError,
    PipelineMetrics, RenderFormat, Renderer, Result, Sink, SourceLocation, WorkerState,
    DEFAULT_MAX_OBSERVERS, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};

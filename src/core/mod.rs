//! Core pipeline types and traits

pub mod condition;
pub mod error;
pub mod log_event;
pub mod log_level;
pub mod metrics;
pub mod observer;
pub mod pipeline;
pub mod queue;
pub mod render;
pub mod sink;
pub mod worker;

pub use condition::{Condition, LevelFilter};
pub use error::{PipelineError, Result};
pub use log_event::{LogEvent, SourceLocation};
pub use log_level::LogLevel;
pub use metrics::PipelineMetrics;
pub use observer::{ObserverCallback, ObserverId, ObserverRegistry, DEFAULT_MAX_OBSERVERS};
pub use pipeline::{Pipeline, PipelineBuilder, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT};
pub use queue::{BoundedQueue, Dequeued, OverflowPolicy};
pub use render::{RenderFormat, Renderer};
pub use sink::Sink;
pub use worker::WorkerState;

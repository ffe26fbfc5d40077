//! Error types for the log pipeline

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Submit after the queue was closed by shutdown
    #[error("log queue is closed, no further events are accepted")]
    QueueClosed,

    /// Subscribe beyond the registry's fixed maximum
    #[error("observer registry full: {registered}/{max} registrations in use")]
    CapacityExceeded { registered: usize, max: usize },

    /// Drain did not complete within the shutdown timeout
    #[error("shutdown timed out after {waited_ms}ms with events still in flight")]
    ShutdownTimedOut { waited_ms: u64 },

    /// A second pipeline was installed as the process-wide instance
    #[error("global pipeline already initialized")]
    AlreadyInitialized,

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Sink write or flush failure with sink name
    #[error("sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create a registry capacity error
    pub fn capacity_exceeded(registered: usize, max: usize) -> Self {
        PipelineError::CapacityExceeded { registered, max }
    }

    /// Create a shutdown timeout error from the elapsed wait
    pub fn shutdown_timed_out(waited: std::time::Duration) -> Self {
        PipelineError::ShutdownTimedOut {
            waited_ms: waited.as_millis() as u64,
        }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PipelineError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_creation() {
        let err = PipelineError::capacity_exceeded(16, 16);
        assert!(matches!(err, PipelineError::CapacityExceeded { .. }));

        let err = PipelineError::config("BoundedQueue", "capacity must be non-zero");
        assert!(matches!(err, PipelineError::InvalidConfiguration { .. }));

        let err = PipelineError::sink("file", "disk full");
        assert!(matches!(err, PipelineError::Sink { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::capacity_exceeded(16, 16);
        assert_eq!(
            err.to_string(),
            "observer registry full: 16/16 registrations in use"
        );

        let err = PipelineError::shutdown_timed_out(Duration::from_millis(250));
        assert_eq!(
            err.to_string(),
            "shutdown timed out after 250ms with events still in flight"
        );

        let err = PipelineError::sink("console", "stdout closed");
        assert_eq!(err.to_string(), "sink 'console' failed: stdout closed");
    }

    #[test]
    fn test_queue_closed_display() {
        assert_eq!(
            PipelineError::QueueClosed.to_string(),
            "log queue is closed, no further events are accepted"
        );
    }
}

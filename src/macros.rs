//! Call-site macros
//!
//! These build a [`LogEvent`](crate::LogEvent) with the call site's
//! file/line/module captured as the source location and submit it to the
//! given pipeline.
//!
//! # Examples
//!
//! ```
//! use log_pipeline::prelude::*;
//! use log_pipeline::info;
//!
//! let pipeline = Pipeline::builder().build().unwrap();
//!
//! info!(pipeline, "server started");
//!
//! let port = 8080;
//! info!(pipeline, "listening on port {}", port);
//! ```

/// Build and submit an event at an explicit level, capturing the call
/// site. Expands to the `submit` result, so callers may inspect
/// `QueueClosed`.
///
/// # Examples
///
/// ```
/// # use log_pipeline::prelude::*;
/// # let pipeline = Pipeline::builder().build().unwrap();
/// use log_pipeline::log_event;
/// let _ = log_event!(pipeline, LogLevel::Info, "cache warmed");
/// let _ = log_event!(pipeline, LogLevel::Error, "request failed: {}", 500);
/// ```
#[macro_export]
macro_rules! log_event {
    ($pipeline:expr, $level:expr, $($arg:tt)+) => {
        $pipeline.submit(
            $crate::LogEvent::new($level, format!($($arg)+))
                .with_source(file!(), line!(), module_path!()),
        )
    };
}

/// Submit a trace-level event, discarding the result.
#[macro_export]
macro_rules! trace {
    ($pipeline:expr, $($arg:tt)+) => {
        { let _ = $crate::log_event!($pipeline, $crate::LogLevel::Trace, $($arg)+); }
    };
}

/// Submit a debug-level event, discarding the result.
#[macro_export]
macro_rules! debug {
    ($pipeline:expr, $($arg:tt)+) => {
        { let _ = $crate::log_event!($pipeline, $crate::LogLevel::Debug, $($arg)+); }
    };
}

/// Submit an info-level event, discarding the result.
#[macro_export]
macro_rules! info {
    ($pipeline:expr, $($arg:tt)+) => {
        { let _ = $crate::log_event!($pipeline, $crate::LogLevel::Info, $($arg)+); }
    };
}

/// Submit a warn-level event, discarding the result.
#[macro_export]
macro_rules! warn {
    ($pipeline:expr, $($arg:tt)+) => {
        { let _ = $crate::log_event!($pipeline, $crate::LogLevel::Warn, $($arg)+); }
    };
}

/// Submit an error-level event, discarding the result.
#[macro_export]
macro_rules! error {
    ($pipeline:expr, $($arg:tt)+) => {
        { let _ = $crate::log_event!($pipeline, $crate::LogLevel::Error, $($arg)+); }
    };
}

/// Submit a fatal-level event, discarding the result.
#[macro_export]
macro_rules! fatal {
    ($pipeline:expr, $($arg:tt)+) => {
        { let _ = $crate::log_event!($pipeline, $crate::LogLevel::Fatal, $($arg)+); }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::condition::Condition;
    use crate::core::log_level::LogLevel;
    use crate::core::pipeline::Pipeline;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_macros_capture_source_location() {
        let pipeline = Pipeline::builder().min_level(LogLevel::Trace).build().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        pipeline
            .subscribe(
                Condition::any(),
                Arc::new(move |event| {
                    seen_clone
                        .lock()
                        .push((event.level, event.source.clone(), event.message.clone()));
                }),
            )
            .unwrap();

        crate::info!(pipeline, "macro {} args", "formats");
        crate::error!(pipeline, "code {}", 500);
        pipeline.shutdown(Duration::from_secs(5)).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);

        let (level, source, message) = &seen[0];
        assert_eq!(*level, LogLevel::Info);
        assert_eq!(message, "macro formats args");
        let source = source.as_ref().expect("macro captured source");
        assert!(source.file.ends_with("macros.rs"));
        assert!(source.function.contains("macros"));

        assert_eq!(seen[1].0, LogLevel::Error);
    }

    #[test]
    fn test_log_event_returns_submit_result() {
        let pipeline = Pipeline::builder().build().unwrap();
        pipeline.shutdown(Duration::from_secs(5)).unwrap();

        let result = crate::log_event!(pipeline, LogLevel::Info, "after close");
        assert!(result.is_err());
    }
}

//! Log event structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local cache of the producing thread's id string, so the hot path
// does not re-format it on every submit.
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            let id = std::thread::current()
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("{:?}", std::thread::current().id()));
            *cache = Some(id);
        }
        cache
            .as_ref()
            .expect("thread_id cache initialized in previous line")
            .clone()
    })
}

/// Call-site location of a log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub function: String,
}

/// One immutable record of a logging call.
///
/// Constructed by the producer, handed to the queue on submit, owned by the
/// worker from dequeue until it has been written to the sink and dispatched
/// to observers, then dropped. Nothing retains an event past dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
    pub thread_id: String,
}

impl LogEvent {
    /// Sanitize the message to prevent log injection attacks.
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a crafted message cannot fake additional log lines.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message.into()),
            timestamp: Utc::now(),
            source: None,
            thread_id: get_thread_id(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, file: &str, line: u32, function: &str) -> Self {
        self.source = Some(SourceLocation {
            file: file.to_string(),
            line,
            function: function.to_string(),
        });
        self
    }
}

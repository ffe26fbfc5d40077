//! Event rendering
//!
//! Rendering is a pure function from event to string. A render failure
//! never loses the event: the renderer substitutes a placeholder carrying
//! the original message instead of returning an error.

use super::log_event::LogEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Output shape of a rendered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderFormat {
    /// Message only
    Minimal,
    /// Level, timestamp, message
    #[default]
    Standard,
    /// Level, timestamp, source location, thread, message
    Detailed,
    /// One JSON object per event
    Json,
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Minimal => write!(f, "minimal"),
            RenderFormat::Standard => write!(f, "standard"),
            RenderFormat::Detailed => write!(f, "detailed"),
            RenderFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(RenderFormat::Minimal),
            "standard" => Ok(RenderFormat::Standard),
            "detailed" => Ok(RenderFormat::Detailed),
            "json" => Ok(RenderFormat::Json),
            _ => Err(format!("Invalid render format: '{}'", s)),
        }
    }
}

/// Renders events to their textual form for a sink.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    format: RenderFormat,
}

impl Renderer {
    pub fn new(format: RenderFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> RenderFormat {
        self.format
    }

    pub fn render(&self, event: &LogEvent) -> String {
        match self.format {
            RenderFormat::Minimal => event.message.clone(),
            RenderFormat::Standard => format!(
                "[{:5}][{}] {}",
                event.level.to_str(),
                event.timestamp.format(TIMESTAMP_FORMAT),
                event.message
            ),
            RenderFormat::Detailed => {
                let (file, line, function) = match event.source {
                    Some(ref s) => (s.file.as_str(), s.line, s.function.as_str()),
                    None => ("-", 0, "-"),
                };
                format!(
                    "[{:5}][{}][{}:{}:{}][{}] {}",
                    event.level.to_str(),
                    event.timestamp.format(TIMESTAMP_FORMAT),
                    file,
                    line,
                    function,
                    event.thread_id,
                    event.message
                )
            }
            RenderFormat::Json => serde_json::to_string(event).unwrap_or_else(|e| {
                // Keep the message even when serialization fails
                format!("{{\"render_error\":\"{}\",\"message\":{:?}}}", e, event.message)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;

    #[test]
    fn test_minimal_is_message_only() {
        let renderer = Renderer::new(RenderFormat::Minimal);
        let event = LogEvent::new(LogLevel::Info, "just this");
        assert_eq!(renderer.render(&event), "just this");
    }

    #[test]
    fn test_standard_carries_level_and_message() {
        let renderer = Renderer::new(RenderFormat::Standard);
        let rendered = renderer.render(&LogEvent::new(LogLevel::Warn, "careful"));
        assert!(rendered.starts_with("[WARN "));
        assert!(rendered.ends_with("careful"));
    }

    #[test]
    fn test_detailed_includes_source_and_thread() {
        let renderer = Renderer::new(RenderFormat::Detailed);
        let event = LogEvent::new(LogLevel::Error, "boom").with_source("srv.rs", 12, "serve");
        let rendered = renderer.render(&event);
        assert!(rendered.contains("srv.rs:12:serve"));
        assert!(rendered.contains(&event.thread_id));
    }

    #[test]
    fn test_detailed_placeholder_without_source() {
        let renderer = Renderer::new(RenderFormat::Detailed);
        let rendered = renderer.render(&LogEvent::new(LogLevel::Error, "boom"));
        assert!(rendered.contains("[-:0:-]"));
    }

    #[test]
    fn test_json_round_trips_fields() {
        let renderer = Renderer::new(RenderFormat::Json);
        let event = LogEvent::new(LogLevel::Info, "structured").with_source("a.rs", 3, "f");
        let value: serde_json::Value = serde_json::from_str(&renderer.render(&event)).unwrap();
        assert_eq!(value["message"], "structured");
        assert_eq!(value["source"]["line"], 3);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<RenderFormat>().unwrap(), RenderFormat::Json);
        assert_eq!(
            "Detailed".parse::<RenderFormat>().unwrap(),
            RenderFormat::Detailed
        );
        assert!("xml".parse::<RenderFormat>().is_err());
    }
}

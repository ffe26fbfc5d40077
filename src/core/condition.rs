//! Observer match conditions
//!
//! A [`Condition`] is built once at subscribe time and is read-only
//! afterward. Every field that is present must match for the condition to
//! fire (logical AND); an absent field means "don't care", which is
//! distinct from a field set to an empty string.

use super::log_event::LogEvent;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Severity part of a condition: match any level, a minimum, or one exact
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelFilter {
    #[default]
    Any,
    AtLeast(LogLevel),
    Exactly(LogLevel),
}

impl LevelFilter {
    pub fn matches(&self, level: LogLevel) -> bool {
        match self {
            LevelFilter::Any => true,
            LevelFilter::AtLeast(min) => level >= *min,
            LevelFilter::Exactly(exact) => level == *exact,
        }
    }
}

/// Predicate deciding which events an observer receives.
///
/// Message matching is by substring, not exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    pub level: LevelFilter,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
    pub message_substring: Option<String>,
}

impl Condition {
    /// A condition that matches every event.
    pub fn any() -> Self {
        Self::default()
    }

    /// A condition matching events at or above `level`.
    pub fn at_least(level: LogLevel) -> Self {
        Self {
            level: LevelFilter::AtLeast(level),
            ..Self::default()
        }
    }

    /// A condition matching events at exactly `level`.
    pub fn exactly(level: LogLevel) -> Self {
        Self {
            level: LevelFilter::Exactly(level),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    #[must_use]
    pub fn with_message_substring(mut self, needle: impl Into<String>) -> Self {
        self.message_substring = Some(needle.into());
        self
    }

    /// Whether this condition fires for `event`.
    ///
    /// A source-dependent field (file, line, function) set on the condition
    /// never matches an event submitted without a source location.
    pub fn matches(&self, event: &LogEvent) -> bool {
        if !self.level.matches(event.level) {
            return false;
        }
        if let Some(ref file) = self.file {
            match event.source {
                Some(ref source) if source.file == *file => {}
                _ => return false,
            }
        }
        if let Some(line) = self.line {
            match event.source {
                Some(ref source) if source.line == line => {}
                _ => return false,
            }
        }
        if let Some(ref function) = self.function {
            match event.source {
                Some(ref source) if source.function == *function => {}
                _ => return false,
            }
        }
        if let Some(ref needle) = self.message_substring {
            if !event.message.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }

    /// Whether this condition is selected by `filter` for bulk removal.
    ///
    /// The level filters must be equal; file, line, and function are
    /// compared only where the filter sets them.
    pub fn matched_by_filter(&self, filter: &Condition) -> bool {
        if self.level != filter.level {
            return false;
        }
        if filter.file.is_some() && self.file != filter.file {
            return false;
        }
        if filter.line.is_some() && self.line != filter.line {
            return false;
        }
        if filter.function.is_some() && self.function != filter.function {
            return false;
        }
        true
    }
}

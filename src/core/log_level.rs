//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log event, totally ordered from `Trace` to `Off`.
///
/// `Off` is a threshold value only: setting a pipeline's minimum level to
/// `Off` disables submission entirely. Events themselves are never created
/// at `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Off = 6,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Off => "OFF",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal | LogLevel::Off => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parses a level name or a numeric ordinal (`"0"`..`"6"`).
    /// Names are case-insensitive; `WARNING` is accepted as an alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" | "0" => Ok(LogLevel::Trace),
            "DEBUG" | "1" => Ok(LogLevel::Debug),
            "INFO" | "2" => Ok(LogLevel::Info),
            "WARN" | "WARNING" | "3" => Ok(LogLevel::Warn),
            "ERROR" | "4" => Ok(LogLevel::Error),
            "FATAL" | "5" => Ok(LogLevel::Fatal),
            "OFF" | "6" => Ok(LogLevel::Off),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert!(LogLevel::Fatal < LogLevel::Off);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Off".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_parse_ordinals() {
        assert_eq!("0".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("4".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("7".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_display_matches_to_str() {
        assert_eq!(format!("{}", LogLevel::Debug), "DEBUG");
        assert_eq!(LogLevel::Fatal.to_string(), LogLevel::Fatal.to_str());
    }
}

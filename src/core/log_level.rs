//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width every level name is padded to (the length of `CRITICAL`).
pub const LEVEL_NAME_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    #[default]
    Debug = 0,
    Info = 1,
    Notice = 2,
    Warn = 3,
    Error = 4,
    Critical = 5,
    Fatal = 6,
}

impl LogLevel {
    /// All levels in ascending severity.
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Notice,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Notice => "NOTICE",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Name right-padded with spaces to [`LEVEL_NAME_WIDTH`].
    pub fn padded_name(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG   ",
            LogLevel::Info => "INFO    ",
            LogLevel::Notice => "NOTICE  ",
            LogLevel::Warn => "WARN    ",
            LogLevel::Error => "ERROR   ",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Fatal => "FATAL   ",
        }
    }

    /// SGR parameters used to highlight the level name: a background color
    /// with bright white text.
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "45;97",
            LogLevel::Info => "42;97",
            LogLevel::Notice | LogLevel::Warn => "43;97",
            LogLevel::Error | LogLevel::Critical | LogLevel::Fatal => "41;97",
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

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "NOTICE" => Ok(LogLevel::Notice),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_names_share_width() {
        for level in LogLevel::ALL {
            assert_eq!(level.padded_name().len(), LEVEL_NAME_WIDTH);
            assert!(level.padded_name().starts_with(level.to_str()));
        }
        assert_eq!(LogLevel::Info.padded_name(), "INFO    ");
    }

    #[test]
    fn test_ordering_is_total() {
        for pair in LogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(LogLevel::default(), LogLevel::Debug);
    }

    #[test]
    fn test_parse() {
        assert_eq!("notice".parse::<LogLevel>(), Ok(LogLevel::Notice));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}

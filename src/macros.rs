//! Logging macros for ergonomic log message formatting.
//!
//! The level macros format their arguments like `format!` and emit the
//! result as a text payload. [`fields!`](crate::fields) builds a field
//! payload from any `ToString` values.
//!
//! # Examples
//!
//! ```
//! use rust_batch_logger::prelude::*;
//! use rust_batch_logger::{fields, info};
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Fields, the status painted green
//! logger.info(fields![format!("{}-g", 200), "OK", "GET /health"]);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_batch_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use rust_batch_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_batch_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use rust_batch_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_batch_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build();
/// use rust_batch_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log a fatal-level message. The process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Build a [`Payload::Fields`](crate::Payload::Fields) from values
/// implementing `ToString`.
///
/// # Examples
///
/// ```
/// use rust_batch_logger::{fields, Payload};
///
/// let payload = fields![404, "NOT FOUND-r", 1.5];
/// match payload {
///     Payload::Fields(f) => assert_eq!(f, vec!["404", "NOT FOUND-r", "1.5"]),
///     _ => unreachable!(),
/// }
/// ```
#[macro_export]
macro_rules! fields {
    ($($field:expr),* $(,)?) => {
        $crate::Payload::Fields(vec![$(::std::string::ToString::to_string(&$field)),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, Payload};
    use crate::sinks::MemorySink;

    fn logger() -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder().sink(sink.clone()).build();
        (logger, sink)
    }

    #[test]
    fn test_log_macro() {
        let (logger, sink) = logger();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        drop(logger);

        let contents = sink.contents();
        assert!(contents.contains("| Test message | "));
        assert!(contents.contains("| Formatted: 42 | "));
    }

    #[test]
    fn test_level_macros() {
        let (logger, sink) = logger();
        debug!(logger, "d {}", 1);
        info!(logger, "i {}", 2);
        notice!(logger, "n {}", 3);
        warn!(logger, "w {}", 4);
        error!(logger, "e {}", 5);
        critical!(logger, "c {}", 6);
        fatal!(logger, "f {}", 7);
        assert_eq!(logger.metrics().enqueued(), 7);
        drop(logger);

        let contents = sink.contents();
        let texts = ["d 1", "i 2", "n 3", "w 4", "e 5", "c 6", "f 7"];
        for (level, text) in LogLevel::ALL.iter().zip(texts) {
            let line = contents
                .lines()
                .find(|line| line.contains(text))
                .expect("line present");
            assert!(line.contains(level.padded_name()));
        }
    }

    #[test]
    fn test_fields_macro() {
        let status = 500;
        let payload = fields![status, "ERR-r", format!("{}ms", 12)];
        match payload {
            Payload::Fields(f) => assert_eq!(f, vec!["500", "ERR-r", "12ms"]),
            other => panic!("unexpected payload {:?}", other),
        }

        match fields![] {
            Payload::Fields(f) => assert!(f.is_empty()),
            other => panic!("unexpected payload {:?}", other),
        }
    }
}

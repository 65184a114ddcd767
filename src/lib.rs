//! # Rust Batch Logger
//!
//! A level-filtered logger that takes formatting and sink IO off the
//! calling thread.
//!
//! ## Features
//!
//! - **Two delivery modes**: a bounded per-record queue drained by one
//!   worker, or a shared cache flushed to the sink in periodic batches
//! - **Seven levels**: Debug, Info, Notice, Warn, Error, Critical, Fatal
//! - **Colored lines**: `[LEVEL] timestamp | field | ... |` with per-field
//!   background colors selected by `-r`, `-g`, `-b` or `-y` suffixes
//! - **Pluggable**: custom sinks and format pipelines
//!
//! ## Example
//!
//! ```
//! use rust_batch_logger::prelude::*;
//! use std::time::Duration;
//!
//! let sink = MemorySink::new();
//! let mut logger = Logger::builder()
//!     .min_level(LogLevel::Info)
//!     .cache_enabled(true)
//!     .flush_period(Duration::from_millis(10))
//!     .sink(sink.clone())
//!     .build();
//! logger.start().unwrap();
//!
//! logger.info(["200-g", "OK", "GET /"]);
//! logger.shutdown(Duration::from_secs(1));
//!
//! assert!(sink.contents().contains("GET /"));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        DefaultFormat, DeliveryFailure, DeliveryMode, FatalHandler, FieldColor, FlushStatus,
        FormattedRecord, LogFormat, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        LoggerSettings, LoggerState, Payload, Result, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, MemorySink};
    #[cfg(feature = "file")]
    pub use crate::sinks::{FileSink, RotatingFileSink, RotationPolicy, RotationStrategy};
}

pub use crate::core::{
    DefaultFormat, DeliveryFailure, DeliveryMode, FatalHandler, FieldColor, FlushStatus,
    FormattedRecord, LogFormat, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    LoggerSettings, LoggerState, Payload, Result, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::sinks::{ConsoleSink, MemorySink};
#[cfg(feature = "file")]
pub use crate::sinks::{FileSink, RotatingFileSink};

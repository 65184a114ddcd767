//! Core logger types and traits

pub mod cache_batcher;
pub mod config;
pub mod delivery;
pub mod error;
pub mod format;
pub mod log_level;
pub mod logger;
pub mod metrics;
mod queue_writer;
mod scheduler;
pub mod sink;
pub mod timestamp;
mod worker;

pub use cache_batcher::FlushStatus;
pub use config::{
    DeliveryMode, LoggerSettings, DEFAULT_CACHE_CAPACITY, DEFAULT_FLUSH_PERIOD,
    DEFAULT_QUEUE_CAPACITY,
};
pub use delivery::{abort_on_failure, DeliveryFailure, FatalHandler, WRITE_ATTEMPTS};
pub use error::{LoggerError, Result};
pub use format::{DefaultFormat, FieldColor, FormattedRecord, LogFormat, Payload};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, LoggerState, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use timestamp::{fixed_clock, format_timestamp, system_clock, Clock};

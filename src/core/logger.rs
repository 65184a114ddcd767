//! Main logger implementation

use super::{
    cache_batcher::{CacheBatcher, CacheBuffer, FlushStatus},
    config::{DeliveryMode, LoggerSettings},
    delivery::{abort_on_failure, deliver, FatalHandler},
    error::{LoggerError, Result},
    format::{DefaultFormat, LogFormat, Payload},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    queue_writer::QueueWriter,
    scheduler::FlushScheduler,
    sink::Sink,
};
use crate::sinks::ConsoleSink;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle position of a [`Logger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// Configurable; records are held in memory until `start()`
    Unstarted,
    Running(DeliveryMode),
    /// Shut down; further records are discarded
    Stopped,
}

/// Threshold and format, read together at every emission.
struct Pipeline {
    min_level: LogLevel,
    format: Arc<dyn LogFormat>,
}

enum Delivery {
    Unstarted,
    Queue(QueueWriter),
    Cache {
        batcher: Arc<CacheBatcher>,
        scheduler: FlushScheduler,
    },
    Stopped,
}

/// Level-filtered logger with queued or cached delivery.
///
/// Configure it, call [`start`](Logger::start) once, then share it (for
/// example through an `Arc<Logger>`) with every producer. Emission calls
/// never fail and never report errors.
///
/// # Example
///
/// ```
/// use rust_batch_logger::prelude::*;
///
/// let mut logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .sink(MemorySink::new())
///     .build();
/// logger.start().unwrap();
///
/// logger.info("server started");
/// logger.error(["404-r", "NOT FOUND", "GET /missing"]);
/// logger.debug("filtered out");
/// ```
pub struct Logger {
    pipeline: RwLock<Pipeline>,
    settings: LoggerSettings,
    sink: Mutex<Option<Box<dyn Sink>>>,
    on_fatal: FatalHandler,
    buffer: Arc<CacheBuffer>,
    delivery: Delivery,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// A logger writing to stdout with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(LoggerSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: LoggerSettings) -> Self {
        Self {
            pipeline: RwLock::new(Pipeline {
                min_level: settings.min_level,
                format: Arc::new(DefaultFormat::new()),
            }),
            buffer: Arc::new(CacheBuffer::with_capacity(settings.cache_capacity)),
            settings,
            sink: Mutex::new(Some(Box::new(ConsoleSink::stdout()))),
            on_fatal: abort_on_failure(),
            delivery: Delivery::Unstarted,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// A logger writing to a size-rotated file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be created.
    #[cfg(feature = "file")]
    pub fn with_rotating_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let mut logger = Self::new();
        logger.set_sink(crate::sinks::RotatingFileSink::new(path)?);
        Ok(logger)
    }

    /// Replace the sink. Has no effect once the logger is started.
    pub fn set_sink<S: Sink + 'static>(&mut self, sink: S) {
        self.set_boxed_sink(Box::new(sink));
    }

    pub fn set_boxed_sink(&mut self, sink: Box<dyn Sink>) {
        if self.warn_if_started("sink") {
            return;
        }
        *self.sink.get_mut() = Some(sink);
    }

    /// `true` selects cached batches, `false` the per-record queue.
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        if !self.warn_if_started("cache_enabled") {
            self.settings.cache_enabled = enabled;
        }
    }

    pub fn set_flush_period(&mut self, period: Duration) {
        if !self.warn_if_started("flush_period") {
            self.settings.flush_period = period;
        }
    }

    pub fn set_queue_capacity(&mut self, capacity: usize) {
        if !self.warn_if_started("queue_capacity") {
            self.settings.queue_capacity = capacity;
        }
    }

    pub fn set_cache_capacity(&mut self, capacity: usize) {
        if !self.warn_if_started("cache_capacity") {
            self.settings.cache_capacity = capacity;
        }
    }

    /// Handler for payloads the sink refused twice.
    pub fn set_fatal_handler(&mut self, handler: FatalHandler) {
        if !self.warn_if_started("fatal_handler") {
            self.on_fatal = handler;
        }
    }

    /// Replace every plain-data setting at once.
    pub fn apply_settings(&mut self, settings: LoggerSettings) {
        if self.warn_if_started("settings") {
            return;
        }
        self.pipeline.write().min_level = settings.min_level;
        self.settings = settings;
    }

    /// Change the threshold. Takes effect for the next emission, also on a
    /// running logger.
    pub fn set_min_level(&self, level: LogLevel) {
        self.pipeline.write().min_level = level;
    }

    /// Replace the format pipeline. Takes effect for the next emission.
    pub fn set_format<F: LogFormat + 'static>(&self, format: F) {
        self.pipeline.write().format = Arc::new(format);
    }

    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        self.pipeline.read().min_level
    }

    /// Settings as they are (or will be, before start) applied.
    #[must_use]
    pub fn settings(&self) -> LoggerSettings {
        LoggerSettings {
            min_level: self.min_level(),
            ..self.settings.clone()
        }
    }

    fn warn_if_started(&self, what: &str) -> bool {
        if matches!(self.delivery, Delivery::Unstarted) {
            return false;
        }
        eprintln!(
            "[LOGGER WARNING] Ignoring change to '{}': the logger is already started",
            what
        );
        true
    }

    /// Start the delivery engine chosen by the settings.
    ///
    /// Records emitted before this call are delivered first.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::AlreadyStarted`] on a second call, a
    /// configuration error for invalid settings, or an IO error if a worker
    /// thread cannot be spawned.
    pub fn start(&mut self) -> Result<()> {
        if !matches!(self.delivery, Delivery::Unstarted) {
            return Err(LoggerError::AlreadyStarted);
        }
        self.settings.validate()?;

        let sink = self
            .sink
            .get_mut()
            .take()
            .ok_or_else(|| LoggerError::config("Logger", "no sink configured"))?;

        self.delivery = match self.settings.delivery_mode() {
            DeliveryMode::Queue => {
                let queue = QueueWriter::spawn(
                    sink,
                    self.settings.queue_capacity,
                    Arc::clone(&self.metrics),
                    Arc::clone(&self.on_fatal),
                )?;
                for line in self.buffer.take_all() {
                    queue.push(line);
                }
                Delivery::Queue(queue)
            }
            DeliveryMode::Cache => {
                let batcher = Arc::new(CacheBatcher::new(
                    Arc::clone(&self.buffer),
                    sink,
                    self.settings.cache_capacity,
                    Arc::clone(&self.metrics),
                    Arc::clone(&self.on_fatal),
                ));
                let scheduler = FlushScheduler::spawn(
                    Arc::clone(&batcher),
                    self.settings.flush_period,
                    Arc::clone(&self.metrics),
                )?;
                Delivery::Cache { batcher, scheduler }
            }
        };

        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> LoggerState {
        match self.delivery {
            Delivery::Unstarted => LoggerState::Unstarted,
            Delivery::Queue(_) => LoggerState::Running(DeliveryMode::Queue),
            Delivery::Cache { .. } => LoggerState::Running(DeliveryMode::Cache),
            Delivery::Stopped => LoggerState::Stopped,
        }
    }

    /// Status of the most recent flush; `None` unless running in cache mode.
    #[must_use]
    pub fn flush_status(&self) -> Option<FlushStatus> {
        match self.delivery {
            Delivery::Cache { ref batcher, .. } => Some(batcher.status()),
            _ => None,
        }
    }

    /// Records accepted but not yet handed to the sink.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        match self.delivery {
            Delivery::Queue(ref queue) => queue.pending(),
            Delivery::Stopped => 0,
            _ => self.buffer.len(),
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn log(&self, level: LogLevel, payload: impl Into<Payload>) {
        // threshold and format come from one snapshot of the pipeline
        let format = {
            let pipeline = self.pipeline.read();
            if level < pipeline.min_level {
                self.metrics.record_filtered();
                return;
            }
            Arc::clone(&pipeline.format)
        };

        let record = format.format(level, &payload.into());
        if !record.should_emit {
            self.metrics.record_suppressed();
            return;
        }
        self.enqueue(record.render());
    }

    fn enqueue(&self, line: String) {
        let accepted = match self.delivery {
            Delivery::Unstarted => {
                self.buffer.append(line);
                true
            }
            Delivery::Cache { ref batcher, .. } => {
                batcher.append(line);
                true
            }
            Delivery::Queue(ref queue) => queue.push(line),
            Delivery::Stopped => false,
        };

        if accepted {
            self.metrics.record_enqueued();
        } else {
            self.metrics.record_discarded();
        }
    }

    /// Write the cached batch now instead of waiting for the next tick.
    ///
    /// Waits for a scheduled flush that is already running. In queue mode
    /// records are written as they are dequeued, so this does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::LoggerStopped`] after shutdown.
    pub fn flush(&self) -> Result<()> {
        match self.delivery {
            Delivery::Cache { ref batcher, .. } => {
                batcher.flush();
                Ok(())
            }
            Delivery::Stopped => Err(LoggerError::LoggerStopped),
            Delivery::Unstarted | Delivery::Queue(_) => Ok(()),
        }
    }

    #[inline]
    pub fn debug(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Debug, payload);
    }

    #[inline]
    pub fn info(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Info, payload);
    }

    #[inline]
    pub fn notice(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Notice, payload);
    }

    #[inline]
    pub fn warn(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Warn, payload);
    }

    #[inline]
    pub fn error(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Error, payload);
    }

    #[inline]
    pub fn critical(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Critical, payload);
    }

    /// Log at `Fatal`. Only logs; the process keeps running.
    #[inline]
    pub fn fatal(&self, payload: impl Into<Payload>) {
        self.log(LogLevel::Fatal, payload);
    }

    /// Stop the background threads after delivering everything accepted so
    /// far.
    ///
    /// In queue mode the drain thread empties the queue; in cache mode the
    /// timer stops and a final flush runs. A logger that was never started
    /// writes its held records straight to the sink.
    ///
    /// Returns `true` if shutdown completed within `timeout`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_batch_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let sink = MemorySink::new();
    /// let mut logger = Logger::builder().sink(sink.clone()).build();
    /// logger.start().unwrap();
    /// logger.info("Important message");
    ///
    /// assert!(logger.shutdown(Duration::from_secs(10)));
    /// assert!(sink.contents().contains("Important message"));
    /// ```
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        match std::mem::replace(&mut self.delivery, Delivery::Stopped) {
            Delivery::Unstarted => {
                self.drain_unstarted();
                true
            }
            Delivery::Queue(mut queue) => queue.stop(timeout),
            Delivery::Cache { mut scheduler, .. } => scheduler.stop(timeout),
            Delivery::Stopped => true,
        }
    }

    fn drain_unstarted(&mut self) {
        let lines = self.buffer.take_all();
        let Some(sink) = self.sink.get_mut().as_mut() else {
            return;
        };
        if !lines.is_empty() {
            deliver(&mut **sink, &lines.concat(), &self.metrics, &self.on_fatal);
        }
        if let Err(e) = sink.flush() {
            eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if matches!(self.delivery, Delivery::Stopped) {
            return;
        }
        if !self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!("[LOGGER WARNING] Logger did not shut down cleanly; some logs may be lost");
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_batch_logger::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Notice)
///     .sink(ConsoleSink::stderr())
///     .cache_enabled(true)
///     .flush_period(Duration::from_millis(50))
///     .on_fatal(Arc::new(|failure: DeliveryFailure| {
///         eprintln!("log data lost: {}", failure.error)
///     }))
///     .build();
/// ```
pub struct LoggerBuilder {
    settings: LoggerSettings,
    sink: Option<Box<dyn Sink>>,
    format: Option<Arc<dyn LogFormat>>,
    on_fatal: Option<FatalHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            settings: LoggerSettings::default(),
            sink: None,
            format: None,
            on_fatal: None,
        }
    }

    /// Start from `settings` instead of the defaults
    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: LoggerSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.settings.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.settings.cache_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_period(mut self, period: Duration) -> Self {
        self.settings.flush_period = period;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.settings.cache_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.settings.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format<F: LogFormat + 'static>(mut self, format: F) -> Self {
        self.format = Some(Arc::new(format));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_fatal(mut self, handler: FatalHandler) -> Self {
        self.on_fatal = Some(handler);
        self
    }

    /// Build an unstarted Logger
    pub fn build(self) -> Logger {
        let mut logger = Logger::with_settings(self.settings);
        if let Some(sink) = self.sink {
            logger.set_boxed_sink(sink);
        }
        if let Some(format) = self.format {
            logger.pipeline.get_mut().format = format;
        }
        if let Some(handler) = self.on_fatal {
            logger.set_fatal_handler(handler);
        }
        logger
    }

    /// Build and start the Logger
    ///
    /// # Errors
    ///
    /// See [`Logger::start`].
    pub fn start(self) -> Result<Logger> {
        let mut logger = self.build();
        logger.start()?;
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::FormattedRecord;
    use crate::sinks::MemorySink;

    fn memory_logger(cache_enabled: bool) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .sink(sink.clone())
            .cache_enabled(cache_enabled)
            .flush_period(Duration::from_secs(3600))
            .build();
        (logger, sink)
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::new();
        assert_eq!(logger.state(), LoggerState::Unstarted);
        assert_eq!(logger.min_level(), LogLevel::Debug);
        assert_eq!(logger.settings(), LoggerSettings::default());
    }

    #[test]
    fn test_double_start_is_rejected() {
        let (mut logger, _) = memory_logger(true);
        logger.start().expect("first start");
        assert!(matches!(logger.start(), Err(LoggerError::AlreadyStarted)));
        assert_eq!(logger.state(), LoggerState::Running(DeliveryMode::Cache));
    }

    #[test]
    fn test_invalid_settings_fail_start() {
        let (mut logger, _) = memory_logger(true);
        logger.set_flush_period(Duration::ZERO);
        assert!(matches!(
            logger.start(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert_eq!(logger.state(), LoggerState::Unstarted);
    }

    #[test]
    fn test_threshold_filters() {
        let (mut logger, sink) = memory_logger(true);
        logger.set_min_level(LogLevel::Warn);
        logger.start().expect("start");

        logger.info("quiet");
        logger.warn("loud");
        logger.flush().expect("flush");

        assert_eq!(logger.metrics().filtered(), 1);
        assert_eq!(sink.writes().len(), 1);
        assert!(sink.contents().contains("loud"));
        assert!(!sink.contents().contains("quiet"));
    }

    #[test]
    fn test_records_before_start_are_kept() {
        for cache_enabled in [true, false] {
            let (mut logger, sink) = memory_logger(cache_enabled);
            logger.info("early");
            assert_eq!(logger.pending_count(), 1);

            logger.start().expect("start");
            logger.info("late");
            assert!(logger.shutdown(Duration::from_secs(5)));

            let contents = sink.contents();
            let early = contents.find("early").expect("early delivered");
            let late = contents.find("late").expect("late delivered");
            assert!(early < late);
        }
    }

    #[test]
    fn test_setters_ignored_after_start() {
        let (mut logger, _) = memory_logger(true);
        logger.start().expect("start");
        logger.set_cache_enabled(false);
        logger.set_queue_capacity(1);
        assert!(logger.settings().cache_enabled);
        assert_eq!(logger.settings().queue_capacity, 100_000);
    }

    #[test]
    fn test_vetoed_records_are_counted() {
        let (mut logger, sink) = memory_logger(true);
        logger.start().expect("start");
        logger.info(Payload::other(vec![1_u8, 2, 3]));
        logger.flush().expect("flush");

        assert_eq!(logger.metrics().suppressed(), 1);
        assert!(sink.writes().is_empty());
    }

    #[test]
    fn test_custom_format() {
        let (mut logger, sink) = memory_logger(false);
        logger.set_format(|level: LogLevel, payload: &Payload| match payload {
            Payload::Text(text) => {
                FormattedRecord::new("{}: {}\n".into(), vec![level.to_string(), text.clone()])
            }
            _ => FormattedRecord::suppressed(),
        });
        logger.start().expect("start");
        logger.notice("plain");
        assert!(logger.shutdown(Duration::from_secs(5)));

        assert_eq!(sink.writes(), vec!["NOTICE: plain\n"]);
    }

    #[test]
    fn test_after_shutdown() {
        let (mut logger, sink) = memory_logger(true);
        logger.start().expect("start");
        assert!(logger.shutdown(Duration::from_secs(5)));

        logger.info("dropped");
        assert_eq!(logger.state(), LoggerState::Stopped);
        assert_eq!(logger.metrics().discarded(), 1);
        assert!(matches!(logger.flush(), Err(LoggerError::LoggerStopped)));
        assert!(sink.writes().is_empty());
        assert!(logger.shutdown(Duration::from_secs(1)));
    }

    #[test]
    fn test_drop_unstarted_writes_held_records() {
        let (logger, sink) = memory_logger(true);
        logger.error("held");
        drop(logger);
        assert!(sink.contents().contains("held"));
    }
}

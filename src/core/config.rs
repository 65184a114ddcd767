//! Engine settings
//!
//! [`LoggerSettings`] is the plain-data half of the logger configuration:
//! threshold, delivery mode, capacities and flush period. It can be built in
//! code or loaded from JSON. The sink, format pipeline and fatal handler are
//! configured on the [`Logger`](super::Logger) directly.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_FLUSH_PERIOD: Duration = Duration::from_millis(100);
pub const DEFAULT_CACHE_CAPACITY: usize = 128;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100_000;

/// Which delivery engine a started logger runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Bounded queue drained by one worker, one sink write per record.
    Queue,
    /// Shared buffer flushed on a timer, one sink write per batch.
    Cache,
}

/// # Examples
///
/// ```
/// use rust_batch_logger::{LogLevel, LoggerSettings};
///
/// let json = r#"{"min_level":"Warn","flush_period_ms":250}"#;
/// let settings = LoggerSettings::from_json(json).unwrap();
/// assert_eq!(settings.min_level, LogLevel::Warn);
/// assert!(settings.cache_enabled);
/// assert_eq!(settings.flush_period.as_millis(), 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Records below this level are discarded at emission time
    pub min_level: LogLevel,
    /// `true` selects the cache batcher, `false` the queue writer
    pub cache_enabled: bool,
    /// Interval between scheduled flushes (cache mode)
    #[serde(rename = "flush_period_ms", with = "duration_millis")]
    pub flush_period: Duration,
    /// Initial capacity of the cache buffer (cache mode)
    pub cache_capacity: usize,
    /// Maximum number of pending records (queue mode). Zero makes every
    /// emission wait for the drain worker to take the record.
    pub queue_capacity: usize,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Debug,
            cache_enabled: true,
            flush_period: DEFAULT_FLUSH_PERIOD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl LoggerSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_flush_period(mut self, period: Duration) -> Self {
        self.flush_period = period;
        self
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn delivery_mode(&self) -> DeliveryMode {
        if self.cache_enabled {
            DeliveryMode::Cache
        } else {
            DeliveryMode::Queue
        }
    }

    /// Check the settings the selected delivery mode depends on.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for a zero flush period
    /// in cache mode.
    pub fn validate(&self) -> Result<()> {
        if self.delivery_mode() == DeliveryMode::Cache && self.flush_period.is_zero() {
            return Err(LoggerError::config(
                "LoggerSettings",
                "flush_period must be greater than zero",
            ));
        }
        Ok(())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

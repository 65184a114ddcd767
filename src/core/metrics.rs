//! Logger metrics for observability
//!
//! Counters for what happened to emitted records and to the delivery engine:
//! filtering, vetoes, sink writes and retries, flushes and skipped ticks.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_batch_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_write();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.writes(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted by the filter and handed to the delivery engine
    enqueued: AtomicU64,

    /// Records rejected by the level threshold
    filtered: AtomicU64,

    /// Records vetoed by the format pipeline
    suppressed: AtomicU64,

    /// Records discarded because the logger was already stopped
    discarded: AtomicU64,

    /// Successful sink writes (one per record in queue mode, one per batch in cache mode)
    writes: AtomicU64,

    /// Sink writes that failed once and were retried
    retries: AtomicU64,

    /// Sink writes that failed twice and were handed to the fatal handler
    fatal_failures: AtomicU64,

    /// Flushes that wrote a non-empty batch
    flushes: AtomicU64,

    /// Scheduler ticks skipped because a flush was in progress
    skipped_ticks: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            fatal_failures: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            skipped_ticks: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn fatal_failures(&self) -> u64 {
        self.fatal_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.discarded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write(&self) -> u64 {
        self.writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_retry(&self) -> u64 {
        self.retries.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_fatal_failure(&self) -> u64 {
        self.fatal_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_skipped_tick(&self) -> u64 {
        self.skipped_ticks.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        for counter in [
            &self.enqueued,
            &self.filtered,
            &self.suppressed,
            &self.discarded,
            &self.writes,
            &self.retries,
            &self.fatal_failures,
            &self.flushes,
            &self.skipped_ticks,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            filtered: AtomicU64::new(self.filtered()),
            suppressed: AtomicU64::new(self.suppressed()),
            discarded: AtomicU64::new(self.discarded()),
            writes: AtomicU64::new(self.writes()),
            retries: AtomicU64::new(self.retries()),
            fatal_failures: AtomicU64::new(self.fatal_failures()),
            flushes: AtomicU64::new(self.flushes()),
            skipped_ticks: AtomicU64::new(self.skipped_ticks()),
        }
    }
}

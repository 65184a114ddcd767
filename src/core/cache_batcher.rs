//! Micro-batched delivery
//!
//! Producers append rendered lines to a [`CacheBuffer`] under its lock and
//! return without touching the sink. A flush exchanges the buffer with a
//! spare vector of the same capacity while holding the lock, releases it,
//! and writes the whole batch with a single sink call.

use super::delivery::{deliver, FatalHandler};
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Progress of the most recent flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushStatus {
    /// No flush has run yet
    #[default]
    Init,
    InProgress,
    Done,
}

/// Rendered lines waiting for the next flush.
#[derive(Debug)]
pub(crate) struct CacheBuffer {
    entries: Mutex<Vec<String>>,
}

impl CacheBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub(crate) fn append(&self, line: String) {
        self.entries.lock().push(line);
    }

    /// Exchange the buffered entries with `spare`, which must be empty.
    pub(crate) fn swap(&self, spare: &mut Vec<String>) {
        debug_assert!(spare.is_empty());
        std::mem::swap(&mut *self.entries.lock(), spare);
    }

    /// Remove and return everything buffered.
    pub(crate) fn take_all(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub(crate) fn reserve(&self, capacity: usize) {
        let mut entries = self.entries.lock();
        let additional = capacity.saturating_sub(entries.len());
        entries.reserve(additional);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

struct BatchWriter {
    sink: Box<dyn Sink>,
    spare: Vec<String>,
}

/// Owns the sink in cache mode and performs flushes one at a time.
pub(crate) struct CacheBatcher {
    buffer: Arc<CacheBuffer>,
    status: RwLock<FlushStatus>,
    // held for the whole flush, so flushes never overlap
    writer: Mutex<BatchWriter>,
    metrics: Arc<LoggerMetrics>,
    on_fatal: FatalHandler,
}

impl CacheBatcher {
    pub(crate) fn new(
        buffer: Arc<CacheBuffer>,
        sink: Box<dyn Sink>,
        capacity: usize,
        metrics: Arc<LoggerMetrics>,
        on_fatal: FatalHandler,
    ) -> Self {
        buffer.reserve(capacity);
        Self {
            buffer,
            status: RwLock::new(FlushStatus::Init),
            writer: Mutex::new(BatchWriter {
                sink,
                spare: Vec::with_capacity(capacity),
            }),
            metrics,
            on_fatal,
        }
    }

    pub(crate) fn status(&self) -> FlushStatus {
        *self.status.read()
    }

    pub(crate) fn append(&self, line: String) {
        self.buffer.append(line);
    }

    /// Write everything buffered so far as one batch.
    ///
    /// Returns `false` when the buffer was empty and nothing was written.
    pub(crate) fn flush(&self) -> bool {
        let mut writer = self.writer.lock();
        let _status = StatusGuard::enter(&self.status);
        let BatchWriter { sink, spare } = &mut *writer;

        self.buffer.swap(spare);
        if spare.is_empty() {
            return false;
        }

        let payload = spare.concat();
        // keep the allocation for the next swap
        spare.clear();

        deliver(&mut **sink, &payload, &self.metrics, &self.on_fatal);
        self.metrics.record_flush();
        true
    }

    /// Flush, then ask the sink to push its own buffers out.
    pub(crate) fn flush_and_sync(&self) -> bool {
        let wrote = self.flush();
        let mut writer = self.writer.lock();
        if let Err(e) = writer.sink.flush() {
            eprintln!(
                "[LOGGER ERROR] Sink '{}' flush failed: {}",
                writer.sink.name(),
                e
            );
        }
        wrote
    }
}

/// Marks a flush InProgress for its lifetime and Done when dropped, also
/// when the sink panics.
struct StatusGuard<'a> {
    status: &'a RwLock<FlushStatus>,
}

impl<'a> StatusGuard<'a> {
    fn enter(status: &'a RwLock<FlushStatus>) -> Self {
        *status.write() = FlushStatus::InProgress;
        Self { status }
    }
}

impl Drop for StatusGuard<'_> {
    fn drop(&mut self) {
        *self.status.write() = FlushStatus::Done;
    }
}

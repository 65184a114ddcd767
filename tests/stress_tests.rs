//! Stress tests for both delivery modes
//!
//! These tests verify:
//! - A tiny queue blocks producers instead of dropping records
//! - Many producers against a slow sink lose nothing in either mode
//! - A slow sink makes the scheduler skip ticks rather than stack flushes
//! - Threshold changes while producers run are safe

use rust_batch_logger::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SHUTDOWN: Duration = Duration::from_secs(30);

fn bare_format(_level: LogLevel, payload: &Payload) -> FormattedRecord {
    match payload {
        Payload::Text(text) => FormattedRecord::new("{}\n".into(), vec![text.clone()]),
        _ => FormattedRecord::suppressed(),
    }
}

/// Sleeps on every write, then forwards to a [`MemorySink`].
struct SlowSink {
    inner: MemorySink,
    delay: Duration,
    in_write: Arc<AtomicUsize>,
    max_concurrent: Arc<AtomicUsize>,
}

impl SlowSink {
    fn new(inner: MemorySink, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_write: Arc::new(AtomicUsize::new(0)),
            max_concurrent: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Sink for SlowSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let now = self.in_write.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.delay);
        let result = self.inner.write(bytes);
        self.in_write.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &str {
        "slow"
    }
}

fn spawn_producers(
    logger: &Arc<Logger>,
    threads: usize,
    per_thread: usize,
) -> Vec<thread::JoinHandle<()>> {
    (0..threads)
        .map(|t| {
            let logger = Arc::clone(logger);
            thread::spawn(move || {
                for i in 0..per_thread {
                    logger.info(format!("{}:{}", t, i));
                }
            })
        })
        .collect()
}

fn unwrap_logger(logger: Arc<Logger>) -> Logger {
    Arc::try_unwrap(logger).unwrap_or_else(|_| panic!("logger still shared"))
}

fn assert_all_delivered(sink: &MemorySink, threads: usize, per_thread: usize) {
    let contents = sink.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), threads * per_thread, "record count");

    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(unique.len(), lines.len(), "duplicated records");
}

#[test]
fn test_tiny_queue_blocks_instead_of_dropping() {
    let sink = MemorySink::new();
    let mut logger = Logger::builder()
        .cache_enabled(false)
        .queue_capacity(1)
        .format(bare_format)
        .sink(SlowSink::new(sink.clone(), Duration::from_micros(200)))
        .build();
    logger.start().expect("start");

    let logger = Arc::new(logger);
    for handle in spawn_producers(&logger, 4, 100) {
        handle.join().expect("producer");
    }

    let mut logger = unwrap_logger(logger);
    assert!(logger.shutdown(SHUTDOWN));
    assert_all_delivered(&sink, 4, 100);
    assert_eq!(logger.metrics().discarded(), 0);
}

#[test]
fn test_cache_mode_heavy_load() {
    let sink = MemorySink::new();
    let mut logger = Logger::builder()
        .flush_period(Duration::from_millis(2))
        .cache_capacity(16)
        .format(bare_format)
        .sink(SlowSink::new(sink.clone(), Duration::from_millis(1)))
        .build();
    logger.start().expect("start");

    let logger = Arc::new(logger);
    for handle in spawn_producers(&logger, 16, 1_000) {
        handle.join().expect("producer");
    }

    let mut logger = unwrap_logger(logger);
    assert!(logger.shutdown(SHUTDOWN));
    assert_all_delivered(&sink, 16, 1_000);
    // batching: far fewer writes than records
    assert!(sink.write_count() < 16_000);
}

#[test]
fn test_slow_sink_skips_ticks_and_never_overlaps() {
    let sink = MemorySink::new();
    let slow = SlowSink::new(sink.clone(), Duration::from_millis(30));
    let max_concurrent = Arc::clone(&slow.max_concurrent);

    let mut logger = Logger::builder()
        .flush_period(Duration::from_millis(1))
        .format(bare_format)
        .sink(slow)
        .build();
    logger.start().expect("start");

    for i in 0..20 {
        logger.info(format!("burst {}", i));
        thread::sleep(Duration::from_millis(5));
    }
    assert!(logger.shutdown(SHUTDOWN));

    assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
    assert!(logger.metrics().skipped_ticks() > 0);
    assert_eq!(sink.contents().lines().count(), 20);
}

#[test]
fn test_manual_flush_races_scheduler() {
    let sink = MemorySink::new();
    let slow = SlowSink::new(sink.clone(), Duration::from_micros(100));
    let max_concurrent = Arc::clone(&slow.max_concurrent);

    let mut logger = Logger::builder()
        .flush_period(Duration::from_millis(1))
        .format(bare_format)
        .sink(slow)
        .build();
    logger.start().expect("start");

    let logger = Arc::new(logger);
    let flusher = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for _ in 0..200 {
                logger.flush().expect("flush");
            }
        })
    };
    let producers = spawn_producers(&logger, 4, 500);
    for handle in producers {
        handle.join().expect("producer");
    }
    flusher.join().expect("flusher");

    let mut logger = unwrap_logger(logger);
    assert!(logger.shutdown(SHUTDOWN));
    assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
    assert_all_delivered(&sink, 4, 500);
}

#[test]
fn test_threshold_changes_under_load() {
    let sink = MemorySink::new();
    let mut logger = Logger::builder()
        .flush_period(Duration::from_millis(1))
        .format(bare_format)
        .sink(sink.clone())
        .build();
    logger.start().expect("start");

    let logger = Arc::new(logger);
    let running = Arc::new(AtomicBool::new(true));
    let toggler = {
        let logger = Arc::clone(&logger);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut quiet = false;
            while running.load(Ordering::Relaxed) {
                quiet = !quiet;
                logger.set_min_level(if quiet { LogLevel::Error } else { LogLevel::Debug });
                thread::yield_now();
            }
        })
    };

    let producers = spawn_producers(&logger, 4, 2_000);
    for handle in producers {
        handle.join().expect("producer");
    }
    running.store(false, Ordering::Relaxed);
    toggler.join().expect("toggler");

    let mut logger = unwrap_logger(logger);
    assert!(logger.shutdown(SHUTDOWN));

    let metrics = logger.metrics();
    assert_eq!(metrics.enqueued() + metrics.filtered(), 8_000);
    assert_eq!(sink.contents().lines().count() as u64, metrics.enqueued());
}

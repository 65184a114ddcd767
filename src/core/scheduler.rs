//! Periodic flush scheduling for the cache batcher
//!
//! A ticker thread wakes every flush period. If no flush is in progress it
//! hands one to the flush thread and goes back to sleep without waiting for
//! it; otherwise the tick is skipped, never queued.
//!
//! There is no watchdog: a sink write that never returns keeps the status
//! InProgress and every later tick is skipped.

use super::cache_batcher::{CacheBatcher, FlushStatus};
use super::error::Result;
use super::metrics::LoggerMetrics;
use super::worker::{isolate_panic, join_with_timeout, spawn_named};
use crossbeam_channel::{bounded, select, tick, Sender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

pub(crate) struct FlushScheduler {
    stop: Option<Sender<()>>,
    ticker: Option<JoinHandle<()>>,
    flusher: Option<JoinHandle<()>>,
}

impl FlushScheduler {
    pub(crate) fn spawn(
        batcher: Arc<CacheBatcher>,
        period: Duration,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Self> {
        // capacity 1: one flush may wait while none is running
        let (request_tx, request_rx) = bounded::<()>(1);
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let flush_batcher = Arc::clone(&batcher);
        let flusher = spawn_named("logger-flush", move || {
            for () in request_rx.iter() {
                isolate_panic("Scheduled flush", || {
                    flush_batcher.flush();
                });
            }
            // scheduler stopped: write whatever is left
            isolate_panic("Final flush", || {
                flush_batcher.flush_and_sync();
            });
        })?;

        let ticker = spawn_named("logger-ticker", move || {
            let ticks = tick(period);
            loop {
                select! {
                    recv(ticks) -> _ => {
                        if batcher.status() == FlushStatus::InProgress {
                            metrics.record_skipped_tick();
                            continue;
                        }
                        match request_tx.try_send(()) {
                            Ok(()) => {}
                            Err(TrySendError::Full(())) => {
                                metrics.record_skipped_tick();
                            }
                            Err(TrySendError::Disconnected(())) => break,
                        }
                    }
                    recv(stop_rx) -> _ => break,
                }
            }
            // dropping request_tx ends the flush thread
        })?;

        Ok(Self {
            stop: Some(stop_tx),
            ticker: Some(ticker),
            flusher: Some(flusher),
        })
    }

    /// Stop ticking, let the flush thread write the remaining buffer, and
    /// join both threads.
    pub(crate) fn stop(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        // a disconnected stop channel wakes the ticker's select
        drop(self.stop.take());

        let mut clean = true;
        if let Some(handle) = self.ticker.take() {
            clean &= join_with_timeout(handle, deadline.saturating_duration_since(Instant::now()));
        }
        if let Some(handle) = self.flusher.take() {
            clean &= join_with_timeout(handle, deadline.saturating_duration_since(Instant::now()));
        }
        clean
    }
}

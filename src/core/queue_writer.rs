//! Per-record asynchronous delivery
//!
//! Rendered lines go through a bounded channel to a single drain thread
//! that owns the sink. A full channel blocks the producer: records are
//! never dropped for lack of space.

use super::delivery::{deliver, FatalHandler};
use super::error::Result;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use super::worker::{isolate_panic, join_with_timeout, spawn_named};
use crossbeam_channel::{bounded, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

pub(crate) struct QueueWriter {
    sender: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl QueueWriter {
    pub(crate) fn spawn(
        mut sink: Box<dyn Sink>,
        capacity: usize,
        metrics: Arc<LoggerMetrics>,
        on_fatal: FatalHandler,
    ) -> Result<Self> {
        let (sender, receiver) = bounded::<String>(capacity);

        let worker = spawn_named("logger-drain", move || {
            // Ends once every sender is gone and the channel is empty
            for line in receiver.iter() {
                isolate_panic("Sink write", || {
                    deliver(&mut *sink, &line, &metrics, &on_fatal);
                });
            }

            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
            }
        })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queue `line`, blocking while the queue is full.
    ///
    /// Returns `false` if the writer has stopped and the line was not queued.
    pub(crate) fn push(&self, line: String) -> bool {
        match self.sender {
            Some(ref sender) => sender.send(line).is_ok(),
            None => false,
        }
    }

    /// Number of lines waiting for the drain thread.
    pub(crate) fn pending(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Close the queue and wait for the drain thread to write what is left.
    pub(crate) fn stop(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());
        match self.worker.take() {
            Some(handle) => join_with_timeout(handle, timeout),
            None => true,
        }
    }
}

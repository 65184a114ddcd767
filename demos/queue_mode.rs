//! Queue mode example
//!
//! Demonstrates per-record delivery through a bounded queue shared by
//! several producer threads, plus a custom fatal handler.
//!
//! Run with: cargo run --example queue_mode

use rust_batch_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    println!("=== Rust Batch Logger - Queue Mode Example ===\n");

    let mut logger = Logger::builder()
        .cache_enabled(false)
        // small queue: producers block whenever the writer falls behind
        .queue_capacity(64)
        .sink(ConsoleSink::stderr())
        .on_fatal(Arc::new(|failure: DeliveryFailure| {
            eprintln!("lost {} bytes: {}", failure.payload.len(), failure.error);
        }))
        .start()?;

    println!("Logging from 4 threads (output on stderr)...");
    let start = Instant::now();

    let logger_ref = &logger;
    thread::scope(|scope| {
        for worker in 0..4 {
            scope.spawn(move || {
                for job in 0..25 {
                    logger_ref.info(vec![
                        format!("worker {}", worker),
                        format!("job {}-g", job),
                    ]);
                }
            });
        }
    });

    let clean = logger.shutdown(Duration::from_secs(5));
    println!(
        "\nDelivered {} records in {:?} (clean shutdown: {})",
        logger.metrics().writes(),
        start.elapsed(),
        clean
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

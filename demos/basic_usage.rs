//! Basic logger usage example
//!
//! Demonstrates the default cache mode with console output, the seven
//! levels, field payloads with color suffixes and the logging macros.
//!
//! Run with: cargo run --example basic_usage

use rust_batch_logger::prelude::*;
use rust_batch_logger::{fields, info, warn};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Batch Logger - Basic Usage Example ===\n");

    // Defaults: stdout, threshold Debug, cached batches flushed every 100 ms
    let mut logger = Logger::new();
    logger.set_flush_period(Duration::from_millis(50));
    logger.start()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.notice("This is a notice message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");
    logger.fatal("This is a fatal message (the process keeps running)");
    logger.flush()?;

    println!("\n2. Field payloads with colors:");
    logger.info(["200-g", "OK", "1ms", "GET /index.html"]);
    logger.warn(["301-y", "MOVED", "0ms", "GET /old"]);
    logger.error(["500-r", "INTERNAL", "12ms", "POST-b", "/api/orders"]);
    logger.info(fields![204, "NO CONTENT", format!("{}ms", 3), "DELETE /api/orders/7"]);
    logger.flush()?;

    println!("\n3. Raising the threshold to Warn:");
    logger.set_min_level(LogLevel::Warn);
    info!(logger, "Info message {} (hidden)", 1);
    warn!(logger, "Warning message {} (visible)", 2);

    logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    let metrics = logger.metrics();
    println!(
        "\nEmitted: {}, filtered: {}, batches written: {}",
        metrics.enqueued(),
        metrics.filtered(),
        metrics.flushes()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

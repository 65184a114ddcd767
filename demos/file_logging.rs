//! File logging example
//!
//! Demonstrates loading settings from JSON and writing through a rotating,
//! compressing file sink.
//!
//! Run with: cargo run --example file_logging

use rust_batch_logger::prelude::*;

const SETTINGS: &str = r#"{
    "min_level": "Info",
    "cache_enabled": true,
    "flush_period_ms": 20,
    "cache_capacity": 256
}"#;

fn main() -> Result<()> {
    println!("=== Rust Batch Logger - File Logging Example ===\n");

    let settings = LoggerSettings::from_json(SETTINGS)?;
    println!("Settings:\n{}\n", settings.to_json()?);

    let policy = RotationPolicy::new()
        .with_max_size(4 * 1024)
        .with_max_backups(3)
        .with_compression(true);
    let sink = RotatingFileSink::with_policy("logs/application.log", policy)?;

    let mut logger = Logger::builder().settings(settings).sink(sink).start()?;

    println!("1. Application lifecycle:");
    logger.info("Application started");
    logger.debug("Loading configuration... (below threshold)");
    logger.notice("Using default settings for some options");
    logger.error(["db-r", "connection refused", "retrying"]);

    println!("2. Enough traffic to rotate a few times:");
    for i in 1..=200 {
        logger.info([
            "200-g".to_string(),
            format!("request {}/200", i),
            format!("{}ms", i % 17),
        ]
        .as_slice());
    }

    if !logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
        eprintln!("Logger did not shut down cleanly");
    }

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/' for application.log and its .gz backups");

    Ok(())
}

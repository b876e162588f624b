//! Basic logger usage example
//!
//! Demonstrates console output, per-level filtering and the batching stats.
//!
//! Run with: cargo run --example basic_usage

use arena_logger::prelude::*;
use arena_logger::{info, warn};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Arena Logger - Basic Usage Example ===\n");

    let mut logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .max_messages_before_flush(16)
        .max_time_between_flush(Duration::from_millis(50))
        .sink(ConsoleSink::new(LogLevel::Trace))
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");
    logger.flush();

    println!("\n2. Raising the minimum level to INFO:");
    logger.set_min_level(LogLevel::Info);
    logger.trace("Trace message (hidden)");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");
    logger.warn("Warning message (visible)");
    logger.flush();

    println!("\n3. Formatting straight into the arena:");
    for attempt in 1..=3 {
        warn!(logger, "Retry attempt {} of {}", attempt, 3);
    }
    info!(logger, "Multi-line input\nstays on one line");

    logger.shutdown()?;

    let stats = logger.stats();
    println!("\n4. Stats:");
    println!("   messages: {}", stats.total_messages);
    println!("   flushes:  {}", stats.total_flushes);
    println!("   avg write: {:?}", stats.average_write_time());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

//! File logging example
//!
//! Loads the logger configuration from JSON, writes every record to a file
//! and only errors to a second file.
//!
//! Run with: cargo run --example file_logging

use arena_logger::prelude::*;
use std::sync::Arc;
use std::thread;

const CONFIG: &str = r#"{
    "message_size_limit": 256,
    "max_messages_before_flush": 64,
    "max_time_between_flush_ms": 100,
    "min_level": "Debug",
    "timestamp_format": "Iso8601"
}"#;

fn main() -> Result<()> {
    let dir = std::env::temp_dir().join("arena_logger_demo");
    std::fs::create_dir_all(&dir)?;
    let all_path = dir.join("app.log");
    let error_path = dir.join("errors.log");

    let config = LoggerConfig::from_json_str(CONFIG)?;
    let logger = Logger::builder()
        .config(config)
        .sink(FileSink::new(&all_path)?.with_exclusive_lock()?)
        .sink(FileSink::new(&error_path)?.with_min_level(LogLevel::Error))
        .build()?;
    let logger = Arc::new(logger);

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for job in 0..100 {
                    let level = if job % 25 == 0 {
                        LogLevel::Error
                    } else {
                        LogLevel::Debug
                    };
                    logger.log_args(level, format_args!("worker {} job {} finished", id, job));
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            eprintln!("worker thread panicked");
        }
    }

    match Arc::try_unwrap(logger) {
        Ok(mut logger) => {
            logger.shutdown()?;
            let stats = logger.stats();
            println!(
                "{} records in {} flushes ({} forced)",
                stats.total_messages, stats.total_flushes, stats.forced_flushes
            );
        }
        Err(_) => eprintln!("logger still shared; it will drain on drop"),
    }

    println!("All records:  {}", all_path.display());
    println!("Errors only:  {}", error_path.display());
    Ok(())
}

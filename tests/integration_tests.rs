//! Integration tests for the arena logger
//!
//! These tests verify:
//! - Log injection prevention through the file sink
//! - Flush triggers: queue size, interval, backpressure and shutdown
//! - Per-thread ordering with concurrent producers
//! - Timestamp format support
//! - Configuration loading from JSON

use arena_logger::core::log_level::LogLevel;
use arena_logger::core::logger::Logger;
use arena_logger::core::timestamp::TimestampFormat;
use arena_logger::core::{LoggerConfig, LoggerError};
use arena_logger::sinks::FileSink;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Text after the `"[LEVEL] timestamp: "` prefix
fn message_of(line: &str) -> &str {
    line.split_once(": ").map(|(_, msg)| msg).unwrap_or("")
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let mut logger = Logger::builder()
        .min_level(LogLevel::Info)
        .sink(FileSink::new(&log_file).expect("Failed to create sink"))
        .build()
        .expect("Failed to build logger");

    let malicious = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    logger.info(malicious);
    logger.shutdown().expect("Failed to shut down");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("\\n"));
    assert!(!content.contains("\nERROR [2024-10-17] Fake error injected\n"));
    assert_eq!(content.lines().count(), 1, "Log should be a single line");
}

#[test]
fn test_unsanitized_records_keep_control_characters() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("raw.log");

    let mut logger = Logger::builder()
        .sanitize(false)
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    logger.info("first\tsecond");
    logger.shutdown().unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    assert_eq!(message_of(&lines[0]), "first\tsecond");
}

#[test]
fn test_record_format_and_levels() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("levels.log");

    let mut logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .timestamp_format(TimestampFormat::Unix)
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    logger.trace("t");
    logger.debug("d");
    logger.info("i");
    logger.warn("w");
    logger.error("e");
    logger.fatal("f");
    logger.shutdown().unwrap();

    let lines = read_lines(&log_file);
    let prefixes: Vec<&str> = lines
        .iter()
        .map(|l| l.split(' ').next().unwrap_or(""))
        .collect();
    assert_eq!(
        prefixes,
        vec!["[TRACE]", "[DEBUG]", "[INFO]", "[WARN]", "[ERROR]", "[FATAL]"]
    );

    for line in &lines {
        let timestamp = line
            .split(' ')
            .nth(1)
            .and_then(|s| s.strip_suffix(':'))
            .expect("missing timestamp");
        assert!(timestamp.parse::<i64>().is_ok(), "not a unix timestamp: {}", line);
    }
}

#[test]
fn test_iso8601_timestamp_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("iso.log");

    let mut logger = Logger::builder()
        .timestamp_format(TimestampFormat::Iso8601)
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    logger.info("iso");
    logger.shutdown().unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    // "[INFO] 2025-01-08T10:30:45.123Z: iso"
    assert!(lines[0].contains('T'));
    assert!(lines[0].contains("Z: iso"));
}

#[test]
fn test_oversized_message_truncated_in_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("truncate.log");

    let mut logger = Logger::builder()
        .message_size_limit(48)
        .max_messages_before_flush(4)
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    logger.info("a".repeat(200));
    logger.info("short");
    logger.shutdown().unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), 48);
    assert!(lines[0].ends_with('a'));
    assert_eq!(message_of(&lines[1]), "short");
    assert_eq!(logger.stats().oversized_message_count, 1);
}

#[test]
fn test_queue_threshold_flushes_without_shutdown() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("threshold.log");

    let logger = Logger::builder()
        .max_messages_before_flush(8)
        .max_time_between_flush(Duration::from_secs(3600))
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    for i in 0..8 {
        logger.info(format!("message {}", i));
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while logger.pending() > 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(logger.pending(), 0);
    assert_eq!(read_lines(&log_file).len(), 8);
}

#[test]
fn test_interval_flushes_partial_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("interval.log");

    let logger = Logger::builder()
        .max_messages_before_flush(1024)
        .max_time_between_flush(Duration::from_millis(25))
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    logger.warn("waiting for the timer");

    let deadline = Instant::now() + Duration::from_secs(5);
    while read_lines(&log_file).is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(read_lines(&log_file).len(), 1);
    assert!(logger.stats().total_flushes >= 1);
}

#[test]
fn test_backpressure_without_worker() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("backpressure.log");

    let mut logger = Logger::builder()
        .background_worker(false)
        .message_size_limit(64)
        .max_messages_before_flush(4)
        .sink(FileSink::new(&log_file).unwrap())
        .build()
        .unwrap();

    for i in 0..10 {
        logger.info(format!("message {}", i));
    }

    // Two full arenas were flushed by the producer itself
    let stats = logger.stats();
    assert_eq!(stats.forced_flushes, 2);
    assert_eq!(logger.pending(), 2);

    logger.shutdown().unwrap();
    let messages: Vec<String> = read_lines(&log_file)
        .iter()
        .map(|l| message_of(l).to_string())
        .collect();
    let expected: Vec<String> = (0..10).map(|i| format!("message {}", i)).collect();
    assert_eq!(messages, expected);
}

#[test]
fn test_concurrent_producers_preserve_per_thread_order() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 250;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let logger = Arc::new(
        Logger::builder()
            .message_size_limit(96)
            .max_messages_before_flush(32)
            .max_time_between_flush(Duration::from_millis(10))
            .sink(FileSink::new(&log_file).unwrap())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for n in 0..PER_THREAD {
                    logger.info(format!("thread {} seq {}", t, n));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }

    let mut logger = Arc::try_unwrap(logger).unwrap_or_else(|_| panic!("logger still shared"));
    logger.shutdown().unwrap();

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut next_seq: HashMap<usize, usize> = HashMap::new();
    for line in &lines {
        let mut parts = message_of(line).split(' ');
        let thread_id: usize = parts.nth(1).unwrap().parse().unwrap();
        let seq: usize = parts.nth(1).unwrap().parse().unwrap();
        let expected = next_seq.entry(thread_id).or_insert(0);
        assert_eq!(seq, *expected, "thread {} out of order", thread_id);
        *expected += 1;
    }
    assert!(next_seq.values().all(|&n| n == PER_THREAD));

    let stats = logger.stats();
    assert_eq!(stats.total_messages, (THREADS * PER_THREAD) as u64);
    assert_eq!(logger.available_bytes(), logger.config().arena_capacity());
}

#[test]
fn test_drop_drains_queue() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("drop.log");

    {
        let logger = Logger::builder()
            .max_time_between_flush(Duration::from_secs(3600))
            .sink(FileSink::new(&log_file).unwrap())
            .build()
            .unwrap();
        logger.error("flushed on drop");
    }

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    assert_eq!(message_of(&lines[0]), "flushed on drop");
}

#[test]
fn test_file_sink_min_level() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let all_file = temp_dir.path().join("all.log");
    let errors_file = temp_dir.path().join("errors.log");

    let mut logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .sink(FileSink::new(&all_file).unwrap())
        .sink(
            FileSink::new(&errors_file)
                .unwrap()
                .with_min_level(LogLevel::Error),
        )
        .build()
        .unwrap();

    logger.debug("debug");
    logger.info("info");
    logger.error("error");
    logger.shutdown().unwrap();

    assert_eq!(read_lines(&all_file).len(), 3);
    let errors = read_lines(&errors_file);
    assert_eq!(errors.len(), 1);
    assert_eq!(message_of(&errors[0]), "error");
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "message_size_limit": 128,
        "max_messages_before_flush": 16,
        "max_time_between_flush_ms": 250,
        "min_level": "Warn"
    }"#;

    let config = LoggerConfig::from_json_str(json).unwrap();
    assert_eq!(config.arena_capacity(), 128 * 16);
    assert_eq!(config.max_time_between_flush, Duration::from_millis(250));

    let logger = Logger::with_config(config).unwrap();
    assert_eq!(logger.min_level(), LogLevel::Warn);

    let bad = r#"{ "max_messages_before_flush": 0 }"#;
    assert!(matches!(
        LoggerConfig::from_json_str(bad),
        Err(LoggerError::InvalidConfiguration { .. })
    ));
}

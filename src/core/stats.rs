//! Logger statistics for observability
//!
//! Counters are updated under the logger lock, by producers for the
//! per-message counters and by whoever runs a flush for the rest.
//! [`crate::Logger::stats`] hands out a copy.

use serde::Serialize;
use std::time::Duration;

/// Snapshot of logger activity
///
/// # Example
///
/// ```
/// use arena_logger::prelude::*;
///
/// let logger = Logger::builder().background_worker(false).build().unwrap();
/// logger.info("hello");
/// logger.flush();
///
/// let stats = logger.stats();
/// assert_eq!(stats.total_flushes, 1);
/// assert_eq!(stats.total_messages, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoggerStats {
    /// Flushes performed, from any trigger
    pub total_flushes: u64,

    /// Flushes a producer ran itself because the arena was full
    pub forced_flushes: u64,

    /// Records queued since the most recent flush
    pub messages_since_last_flush: u64,

    /// Records queued over the logger's lifetime
    pub total_messages: u64,

    /// Records cut to the message size limit
    pub oversized_message_count: u64,

    /// Sink write, flush, or pre-flush calls that failed or panicked
    pub sink_errors: u64,

    pub total_pre_flush_time: Duration,

    pub total_write_time: Duration,

    /// Interval between the two most recent flushes
    pub time_since_last_flush: Duration,
}

impl LoggerStats {
    pub const fn new() -> Self {
        Self {
            total_flushes: 0,
            forced_flushes: 0,
            messages_since_last_flush: 0,
            total_messages: 0,
            oversized_message_count: 0,
            sink_errors: 0,
            total_pre_flush_time: Duration::ZERO,
            total_write_time: Duration::ZERO,
            time_since_last_flush: Duration::ZERO,
        }
    }

    /// Mean write time per flush, zero before the first flush
    pub fn average_write_time(&self) -> Duration {
        if self.total_flushes == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_write_time.as_nanos() / u128::from(self.total_flushes);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Share of records that were truncated, as a percentage (0.0 - 100.0)
    pub fn oversized_rate(&self) -> f64 {
        if self.total_messages == 0 {
            0.0
        } else {
            (self.oversized_message_count as f64 / self.total_messages as f64) * 100.0
        }
    }
}

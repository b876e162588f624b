//! Logger configuration
//!
//! [`LoggerConfig`] carries every construction parameter of a
//! [`crate::Logger`]. It can be built in code through
//! [`crate::LoggerBuilder`] or deserialized from JSON.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MESSAGE_SIZE_LIMIT: usize = 512;
pub const DEFAULT_MAX_MESSAGES_BEFORE_FLUSH: usize = 1024;
pub const DEFAULT_MAX_TIME_BETWEEN_FLUSH: Duration = Duration::from_millis(100);

/// Construction parameters of a logger
///
/// The arena is sized `message_size_limit * max_messages_before_flush`.
///
/// # Example
///
/// ```
/// use arena_logger::core::{LoggerConfig, LogLevel};
/// use std::time::Duration;
///
/// let config = LoggerConfig::from_json_str(
///     r#"{ "message_size_limit": 256, "min_level": "Warn", "max_time_between_flush_ms": 50 }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.message_size_limit, 256);
/// assert_eq!(config.min_level, LogLevel::Warn);
/// assert_eq!(config.max_time_between_flush, Duration::from_millis(50));
/// assert_eq!(config.arena_capacity(), 256 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Maximum bytes of one formatted record, header included
    pub message_size_limit: usize,

    /// Queue length that triggers a flush
    pub max_messages_before_flush: usize,

    /// Longest the worker waits between flushes
    #[serde(rename = "max_time_between_flush_ms", with = "duration_millis")]
    pub max_time_between_flush: Duration,

    pub min_level: LogLevel,

    pub timestamp_format: TimestampFormat,

    /// Escape `\n`, `\r` and `\t` in message text so one record is one line
    pub sanitize: bool,

    /// Spawn the flush worker. Without it, records are flushed only by
    /// backpressure or an explicit [`crate::Logger::flush`].
    pub background_worker: bool,
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.message_size_limit == 0 {
            return Err(LoggerError::config(
                "Logger",
                "message_size_limit must be greater than zero",
            ));
        }
        if self.max_messages_before_flush == 0 {
            return Err(LoggerError::config(
                "Logger",
                "max_messages_before_flush must be greater than zero",
            ));
        }
        if self
            .message_size_limit
            .checked_mul(self.max_messages_before_flush)
            .is_none()
        {
            return Err(LoggerError::config(
                "Logger",
                "message_size_limit * max_messages_before_flush overflows",
            ));
        }
        if self.max_time_between_flush.is_zero() {
            return Err(LoggerError::config(
                "Logger",
                "max_time_between_flush must be greater than zero",
            ));
        }
        self.timestamp_format.validate()
    }

    #[inline]
    pub fn arena_capacity(&self) -> usize {
        self.message_size_limit * self.max_messages_before_flush
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            message_size_limit: DEFAULT_MESSAGE_SIZE_LIMIT,
            max_messages_before_flush: DEFAULT_MAX_MESSAGES_BEFORE_FLUSH,
            max_time_between_flush: DEFAULT_MAX_TIME_BETWEEN_FLUSH,
            min_level: LogLevel::Debug,
            timestamp_format: TimestampFormat::default(),
            sanitize: true,
            background_worker: true,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

//! Timestamp formatting utilities
//!
//! Every record carries a timestamp rendered by [`TimestampFormat`]. Because
//! formatting a calendar date is far more expensive than everything else on
//! the logging path, [`TimestampCache`] keeps the last rendered string and only
//! re-renders second-resolution formats when the wall-clock second changes.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use arena_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local wall-clock time: `2025-01-08 10:30:45`
    #[default]
    LocalDateTime,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 with offset, whole seconds: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format, rendered in UTC
    ///
    /// ```
    /// use arena_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::LocalDateTime => datetime
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Reject custom patterns chrono cannot render. Formatting such a
    /// pattern panics, so it must be caught before the first record.
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = self {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("invalid strftime pattern '{}'", pattern),
                ));
            }
        }
        Ok(())
    }

    /// Whether two instants within the same second always render the same
    #[must_use]
    pub fn is_second_resolution(&self) -> bool {
        matches!(
            self,
            TimestampFormat::LocalDateTime | TimestampFormat::Rfc3339 | TimestampFormat::Unix
        )
    }
}

/// Last rendered timestamp, reused until the second rolls over
#[derive(Debug)]
pub struct TimestampCache {
    format: TimestampFormat,
    second: Option<i64>,
    rendered: String,
}

impl TimestampCache {
    pub fn new(format: TimestampFormat) -> Self {
        Self {
            format,
            second: None,
            rendered: String::new(),
        }
    }

    pub fn format(&self) -> &TimestampFormat {
        &self.format
    }

    /// Render `now`, reusing the cached text when it cannot have changed
    pub fn render(&mut self, now: DateTime<Utc>) -> &str {
        let second = now.timestamp();
        let reusable = self.format.is_second_resolution() && self.second == Some(second);
        if !reusable {
            self.rendered = self.format.format(&now);
            self.second = Some(second);
        }
        &self.rendered
    }
}

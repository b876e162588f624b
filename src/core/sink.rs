//! Sink trait for log output destinations

use super::{error::Result, log_level::LogLevel, message_entry::Batch};

/// Separator appended after every record in a batch
#[cfg(windows)]
pub const RECORD_SEPARATOR: &[u8] = b"\r\n";
#[cfg(not(windows))]
pub const RECORD_SEPARATOR: &[u8] = b"\n";

/// A destination for flushed log records.
///
/// Sinks are only ever called from inside a flush, with the logger's lock
/// held, so they need no synchronization of their own. They may block.
/// Errors are reported and counted by the logger but never retried.
///
/// # Example
///
/// ```
/// use arena_logger::core::{LogLevel, Result, Sink};
///
/// struct StderrSink;
///
/// impl Sink for StderrSink {
///     fn name(&self) -> &str {
///         "stderr"
///     }
///
///     fn min_level(&self) -> LogLevel {
///         LogLevel::Warn
///     }
///
///     fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
///         use std::io::Write;
///         std::io::stderr().write_all(bytes)?;
///         Ok(())
///     }
///
///     fn flush(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Sink: Send {
    fn name(&self) -> &str;

    /// Records below this level are skipped by [`Sink::write_batch`]
    fn min_level(&self) -> LogLevel;

    #[inline]
    fn should_accept(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Called once per flush before any sink writes, even for an empty batch
    fn pre_flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Concatenate accepted records into `scratch` and write them in one call.
    ///
    /// `scratch` is shared between sinks and flushes; implementations clear
    /// it before use. Nothing is written when no record is accepted.
    fn write_batch(&mut self, batch: &Batch<'_>, scratch: &mut Vec<u8>) -> Result<()> {
        fill_scratch(batch, scratch, |level| self.should_accept(level));
        if scratch.is_empty() {
            return Ok(());
        }
        self.write_bytes(scratch)
    }

    /// The single underlying write of a batch
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Clear `scratch` and append every accepted record followed by
/// [`RECORD_SEPARATOR`], in batch order
pub fn fill_scratch(
    batch: &Batch<'_>,
    scratch: &mut Vec<u8>,
    accept: impl Fn(LogLevel) -> bool,
) {
    scratch.clear();
    for record in batch.iter().filter(|record| accept(record.level)) {
        scratch.extend_from_slice(record.bytes);
        scratch.extend_from_slice(RECORD_SEPARATOR);
    }
}

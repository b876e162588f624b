//! File sink implementation

use crate::core::{LogLevel, LoggerError, Result, Sink};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends each batch to a file through a buffered writer.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    min_level: LogLevel,
    sync_on_flush: bool,
    locked: bool,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            min_level: LogLevel::Trace,
            sync_on_flush: false,
            locked: false,
        })
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Also `fsync` file data on every flush
    #[must_use]
    pub fn with_sync_on_flush(mut self, sync: bool) -> Self {
        self.sync_on_flush = sync;
        self
    }

    /// Take an exclusive advisory lock so no other process appends to the
    /// same file while this sink is alive
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use arena_logger::sinks::FileSink;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_exclusive_lock()
    ///     .unwrap();
    /// ```
    pub fn with_exclusive_lock(mut self) -> Result<Self> {
        self.writer
            .get_ref()
            .try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(self.path.display().to_string()))?;
        self.locked = true;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        if self.sync_on_flush {
            self.writer.get_ref().sync_data()?;
        }
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.flush();
        if self.locked {
            let _ = FileExt::unlock(self.writer.get_ref());
        }
    }
}

//! Process-wide default logger and error logger
//!
//! Explicit, replaceable slots rather than lazily created statics:
//!
//! 1. call [`init`] once, before any thread logs through this module;
//! 2. log with [`log`] or grab a handle with [`get`];
//! 3. call [`shutdown`] only after every producer thread has stopped and
//!    dropped its handle.
//!
//! Records logged through this module before [`init`] or after [`shutdown`]
//! are dropped.
//!
//! The error logger is a second slot. Every failed or panicking sink call of
//! any logger is reported to it as an `Error` (failure) or `Fatal` (panic)
//! record, except failures of the error logger's own sinks.
//!
//! # Example
//!
//! ```
//! use arena_logger::{global, LogLevel, Logger};
//!
//! let logger = Logger::builder().build().unwrap();
//! global::init(logger).unwrap();
//!
//! global::log(LogLevel::Info, "from anywhere");
//!
//! global::shutdown().unwrap();
//! ```

use crate::core::{LogLevel, Logger, LoggerError, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// Where [`init_default_error_logger`] writes
pub const DEFAULT_ERROR_LOG_PATH: &str = "log_error.log";

static GLOBAL: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);
static ERROR_LOGGER: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

fn install(slot: &RwLock<Option<Arc<Logger>>>, logger: Logger) -> Result<()> {
    let mut slot = slot.write();
    if slot.is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    *slot = Some(Arc::new(logger));
    Ok(())
}

/// Shut down a logger removed from its slot.
///
/// With other handles alive the worker cannot be joined; the queue is
/// flushed on this thread and [`LoggerError::StillShared`] is returned.
fn teardown(taken: Option<Arc<Logger>>) -> Result<()> {
    let Some(logger) = taken else {
        return Ok(());
    };
    match Arc::try_unwrap(logger) {
        Ok(mut logger) => logger.shutdown(),
        Err(shared) => {
            shared.flush();
            Err(LoggerError::StillShared {
                handles: Arc::strong_count(&shared) - 1,
            })
        }
    }
}

/// Install the process-wide logger
pub fn init(logger: Logger) -> Result<()> {
    install(&GLOBAL, logger)
}

/// A handle to the process-wide logger, if one is installed
pub fn get() -> Option<Arc<Logger>> {
    GLOBAL.read().clone()
}

pub fn is_initialized() -> bool {
    GLOBAL.read().is_some()
}

pub fn log(level: LogLevel, message: impl AsRef<str>) {
    if let Some(logger) = GLOBAL.read().as_ref() {
        logger.log(level, message);
    }
}

/// Remove the process-wide logger, join its worker and drain its queue.
///
/// If a handle obtained from [`get`] is still alive, the queue is flushed
/// synchronously and [`LoggerError::StillShared`] is returned; the last
/// handle to drop finishes the shutdown.
pub fn shutdown() -> Result<()> {
    let taken = GLOBAL.write().take();
    teardown(taken)
}

/// Install the logger that sink failures are reported to
pub fn init_error_logger(logger: Logger) -> Result<()> {
    install(&ERROR_LOGGER, logger)
}

/// Install an error logger appending `Error` and `Fatal` records to
/// [`DEFAULT_ERROR_LOG_PATH`]
#[cfg(feature = "file")]
pub fn init_default_error_logger() -> Result<()> {
    let sink = crate::sinks::FileSink::new(DEFAULT_ERROR_LOG_PATH)?;
    let logger = Logger::builder()
        .min_level(LogLevel::Error)
        .sink(sink)
        .build()?;
    init_error_logger(logger)
}

pub fn error_logger() -> Option<Arc<Logger>> {
    ERROR_LOGGER.read().clone()
}

/// Remove the error logger and shut it down, as [`shutdown`] does
pub fn shutdown_error_logger() -> Result<()> {
    let taken = ERROR_LOGGER.write().take();
    teardown(taken)
}

/// Forward a sink failure of logger `origin` to the error logger
pub(crate) fn report_sink_failure(origin: usize, level: LogLevel, message: &str) {
    // Clone out of the slot so the lock is not held while logging
    let Some(logger) = ERROR_LOGGER.read().clone() else {
        return;
    };
    if logger.id() != origin {
        logger.log(level, message);
    }
}

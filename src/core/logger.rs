//! Main logger implementation
//!
//! Producers format each record straight into a buffer carved from a
//! [`RingArena`] and append a [`MessageEntry`] to the queue. A single worker
//! thread flushes the queue to every sink when it reaches
//! `max_messages_before_flush`, when `max_time_between_flush` has elapsed, or
//! on shutdown, then hands the buffers back to the arena oldest first.
//!
//! The arena, the queue and the sinks sit behind one mutex. Arena order and
//! queue order are therefore the same order, which is what lets the arena
//! release strictly FIFO. When the arena is out of room, the producer that
//! hit the wall runs the flush itself before retrying.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_level::LogLevel,
    message_entry::{Batch, MessageEntry},
    record_writer::RecordWriter,
    ring_arena::RingArena,
    sink::Sink,
    stats::LoggerStats,
    timestamp::{TimestampCache, TimestampFormat},
};
use crate::global;
use chrono::Utc;
use parking_lot::{Condvar, Mutex, RwLock};
use std::any::Any;
use std::fmt::{self, Write as _};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const WORKER_THREAD_NAME: &str = "arena-logger-worker";

static NEXT_LOGGER_ID: AtomicUsize = AtomicUsize::new(1);

/// What started a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// The queue reached `max_messages_before_flush`
    QueueFull,
    /// `max_time_between_flush` elapsed
    Interval,
    /// A producer found the arena full
    Backpressure,
    /// [`Logger::flush`] was called
    Manual,
    Shutdown,
}

struct State {
    id: usize,
    arena: RingArena,
    queue: Vec<MessageEntry>,
    sinks: Vec<Box<dyn Sink>>,
    scratch: Vec<u8>,
    stats: LoggerStats,
    timestamps: TimestampCache,
    last_flush: Instant,
    terminate: bool,
}

impl State {
    fn flush(&mut self, trigger: FlushTrigger) {
        let id = self.id;
        let pre_flush_start = Instant::now();
        for sink in self.sinks.iter_mut() {
            if !call_sink(id, sink.as_mut(), "pre-flush", |s| s.pre_flush()) {
                self.stats.sink_errors += 1;
            }
        }
        self.stats.total_pre_flush_time += pre_flush_start.elapsed();

        let write_start = Instant::now();
        {
            let batch = Batch::new(&self.arena, &self.queue);
            let scratch = &mut self.scratch;
            for sink in self.sinks.iter_mut() {
                let written = call_sink(id, sink.as_mut(), "write", |s| {
                    s.write_batch(&batch, &mut *scratch)
                });
                if !written {
                    self.stats.sink_errors += 1;
                }
                if !call_sink(id, sink.as_mut(), "flush", |s| s.flush()) {
                    self.stats.sink_errors += 1;
                }
            }
        }
        self.stats.total_write_time += write_start.elapsed();

        for entry in self.queue.drain(..) {
            if let Err(e) = self.arena.release_buffer(entry.into_view()) {
                panic!("[LOGGER CRITICAL] {}", e);
            }
        }

        let now = Instant::now();
        self.stats.total_flushes += 1;
        if trigger == FlushTrigger::Backpressure {
            self.stats.forced_flushes += 1;
        }
        self.stats.messages_since_last_flush = 0;
        self.stats.time_since_last_flush = now.duration_since(self.last_flush);
        self.last_flush = now;
    }
}

/// Run one sink call with panic isolation.
///
/// Failures are reported on stderr and to the process-wide error logger,
/// unless `origin` is that logger. Returns `false` if the call failed or
/// panicked. Failures are not retried.
fn call_sink<F>(origin: usize, sink: &mut dyn Sink, stage: &str, op: F) -> bool
where
    F: FnOnce(&mut dyn Sink) -> Result<()>,
{
    match catch_unwind(AssertUnwindSafe(|| op(&mut *sink))) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            let message = format!("Sink '{}' {} failed: {}", sink.name(), stage, e);
            eprintln!("[LOGGER ERROR] {}", message);
            global::report_sink_failure(origin, LogLevel::Error, &message);
            false
        }
        Err(panic_info) => {
            let message = format!(
                "Sink '{}' panicked during {}: {}",
                sink.name(),
                stage,
                panic_message(panic_info.as_ref())
            );
            eprintln!(
                "[LOGGER CRITICAL] {}. Other sinks continue to function.",
                message
            );
            global::report_sink_failure(origin, LogLevel::Fatal, &message);
            false
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

struct Shared {
    id: usize,
    state: Mutex<State>,
    wake: Condvar,
    min_level: RwLock<LogLevel>,
    config: LoggerConfig,
}

impl Shared {
    fn run_worker(&self) {
        let max_messages = self.config.max_messages_before_flush;
        let interval = self.config.max_time_between_flush;

        let mut state = self.state.lock();
        loop {
            // The predicate is re-checked after every wake: a producer may
            // have flushed under backpressure while we waited for the lock.
            let trigger = loop {
                if state.terminate {
                    break FlushTrigger::Shutdown;
                }
                if state.queue.len() >= max_messages {
                    break FlushTrigger::QueueFull;
                }
                let deadline = state.last_flush + interval;
                if Instant::now() >= deadline {
                    break FlushTrigger::Interval;
                }
                self.wake.wait_until(&mut state, deadline);
            };

            state.flush(trigger);

            if state.terminate && state.queue.is_empty() {
                break;
            }
        }
    }
}

/// Batching logger backed by a ring arena.
///
/// Share it between producer threads behind an `Arc` (all logging methods
/// take `&self`). Sinks are registered before logging starts; `add_sink`
/// takes `&mut self` for that reason.
///
/// # Example
///
/// ```
/// use arena_logger::prelude::*;
/// use std::time::Duration;
///
/// let mut logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .message_size_limit(256)
///     .max_messages_before_flush(64)
///     .max_time_between_flush(Duration::from_millis(50))
///     .build()
///     .unwrap();
///
/// logger.info("service started");
/// logger.debug("filtered out");
/// logger.shutdown().unwrap();
///
/// assert_eq!(logger.stats().total_messages, 1);
/// ```
pub struct Logger {
    shared: Arc<Shared>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Logger {
    /// Create a logger from a configuration, spawning the flush worker if
    /// the configuration asks for one
    pub fn with_config(config: LoggerConfig) -> Result<Self> {
        Self::start(config, Vec::new())
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use arena_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .max_messages_before_flush(128)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn start(config: LoggerConfig, sinks: Vec<Box<dyn Sink>>) -> Result<Self> {
        config.validate()?;

        let id = NEXT_LOGGER_ID.fetch_add(1, Ordering::Relaxed);
        let capacity = config.arena_capacity();
        let state = State {
            id,
            arena: RingArena::new(capacity),
            queue: Vec::with_capacity(config.max_messages_before_flush),
            sinks,
            scratch: Vec::with_capacity(capacity + 2 * config.max_messages_before_flush),
            stats: LoggerStats::new(),
            timestamps: TimestampCache::new(config.timestamp_format.clone()),
            last_flush: Instant::now(),
            terminate: false,
        };

        let shared = Arc::new(Shared {
            id,
            state: Mutex::new(state),
            wake: Condvar::new(),
            min_level: RwLock::new(config.min_level),
            config,
        });

        let worker = if shared.config.background_worker {
            let worker_shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(WORKER_THREAD_NAME.into())
                .spawn(move || worker_shared.run_worker())
                .map_err(|e| {
                    LoggerError::io_operation("spawning flush worker", WORKER_THREAD_NAME, e)
                })?;
            Some(handle)
        } else {
            None
        };

        Ok(Self { shared, worker })
    }

    /// Register a sink. Configuration time only.
    pub fn add_sink(&mut self, sink: Box<dyn Sink>) {
        self.shared.state.lock().sinks.push(sink);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.shared.min_level.write() = level;
    }

    #[inline]
    pub fn min_level(&self) -> LogLevel {
        *self.shared.min_level.read()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.shared.config
    }

    /// Process-unique identity, used to keep the error logger from
    /// reporting into itself
    pub(crate) fn id(&self) -> usize {
        self.shared.id
    }

    #[inline]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.log_args(level, format_args!("{}", message.as_ref()));
    }

    /// Log pre-formatted arguments, rendering them directly into the arena.
    ///
    /// Records below the minimum level return before any locking or
    /// formatting. Panics with [`LoggerError::ArenaExhausted`] if a forced
    /// flush does not free a buffer, which means the configured sizes cannot
    /// hold even one record.
    pub fn log_args(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if level < self.min_level() {
            return;
        }

        let config = &self.shared.config;
        let limit = config.message_size_limit;
        let mut guard = self.shared.state.lock();
        let state = &mut *guard;

        let view = match state.arena.request_buffer(limit) {
            Some(view) => view,
            None => {
                state.flush(FlushTrigger::Backpressure);
                match state.arena.request_buffer(limit) {
                    Some(view) => view,
                    None => panic!(
                        "[LOGGER CRITICAL] {}",
                        LoggerError::arena_exhausted(limit, state.arena.capacity())
                    ),
                }
            }
        };

        // Queue the reservation before formatting. If a `Display` impl
        // panics, the entry stays at length zero: it is skipped by sinks and
        // still released in order by the next flush.
        let index = state.queue.len();
        state.queue.push(MessageEntry::new(view, 0, level));
        let entry = &mut state.queue[index];

        let timestamp = state.timestamps.render(Utc::now());
        let mut writer = RecordWriter::new(state.arena.bytes_mut(entry.view()));
        // Errors here only signal truncation, which `truncated()` reports
        let _ = write!(writer, "[{}] {}: ", level, timestamp);
        writer.set_sanitize(config.sanitize);
        let _ = writer.write_fmt(args);
        let (length, truncated) = (writer.written(), writer.truncated());
        entry.set_length(length);

        if truncated {
            state.stats.oversized_message_count += 1;
        }
        state.stats.messages_since_last_flush += 1;
        state.stats.total_messages += 1;

        if state.terminate {
            // No worker left to pick this up
            state.flush(FlushTrigger::Shutdown);
        } else if state.queue.len() >= config.max_messages_before_flush {
            drop(guard);
            self.shared.wake.notify_one();
        }
    }

    /// Flush every queued record to every sink now, on the calling thread
    pub fn flush(&self) {
        self.shared.state.lock().flush(FlushTrigger::Manual);
    }

    /// Snapshot of the logger statistics
    pub fn stats(&self) -> LoggerStats {
        self.shared.state.lock().stats.clone()
    }

    /// Records queued and not yet flushed
    pub fn pending(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Free bytes left in the arena
    pub fn available_bytes(&self) -> usize {
        self.shared.state.lock().arena.available()
    }

    /// Time elapsed since the most recent flush
    pub fn since_last_flush(&self) -> Duration {
        self.shared.state.lock().last_flush.elapsed()
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Stop the worker and drain the queue.
    ///
    /// Blocks until the worker has flushed everything and exited. Records
    /// logged afterwards are flushed synchronously by the caller. Calling it
    /// again is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        self.shared.state.lock().terminate = true;
        self.shared.wake.notify_all();

        if let Some(handle) = self.worker.take() {
            handle
                .join()
                .map_err(|e| LoggerError::WorkerPanicked(panic_message(e.as_ref())))?;
        }

        let mut state = self.shared.state.lock();
        if !state.queue.is_empty() {
            state.flush(FlushTrigger::Shutdown);
        }
        Ok(())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGGER ERROR] Failed to shut down cleanly: {}", e);
        }

        let errors = self.shared.state.lock().stats.sink_errors;
        if errors > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down after {} failed sink calls",
                errors
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use arena_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .sink(ConsoleSink::new(LogLevel::Info))
///     .message_size_limit(512)
///     .max_messages_before_flush(1024)
///     .max_time_between_flush(Duration::from_millis(100))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: Vec<Box<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sinks: Vec::new(),
        }
    }

    /// Replace the whole configuration, keeping registered sinks
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_size_limit(mut self, limit: usize) -> Self {
        self.config.message_size_limit = limit;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_messages_before_flush(mut self, count: usize) -> Self {
        self.config.max_messages_before_flush = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_time_between_flush(mut self, interval: Duration) -> Self {
        self.config.max_time_between_flush = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sanitize(mut self, sanitize: bool) -> Self {
        self.config.sanitize = sanitize;
        self
    }

    /// Spawn the flush worker (default). Without one, records are flushed by
    /// backpressure, [`Logger::flush`] and shutdown only.
    #[must_use = "builder methods return a new value"]
    pub fn background_worker(mut self, enabled: bool) -> Self {
        self.config.background_worker = enabled;
        self
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Build the Logger, validating the configuration
    pub fn build(self) -> Result<Logger> {
        Logger::start(self.config, self.sinks)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

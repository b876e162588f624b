//! # Arena Logger
//!
//! A low-latency batching logger. Producer threads format records straight
//! into a fixed-size ring arena; one background worker flushes them in
//! batches to every registered sink.
//!
//! ## Features
//!
//! - **Bounded Memory**: every in-flight record lives in a single arena sized
//!   once at startup, reclaimed strictly oldest first
//! - **Batched Output**: each sink receives a whole flush as one write
//! - **Three Flush Triggers**: queue size, elapsed time, and shutdown, plus a
//!   synchronous flush by the producer when the arena is full
//! - **Per-Sink Filtering**: each sink has its own minimum level on top of the
//!   logger's
//!
//! ```
//! use arena_logger::prelude::*;
//!
//! let mut logger = Logger::builder()
//!     .min_level(LogLevel::Info)
//!     .build()
//!     .unwrap();
//!
//! logger.info("ready");
//! logger.shutdown().unwrap();
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::core::{
        Batch, FlushTrigger, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerStats, Record, Result, Sink, TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use crate::sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use crate::sinks::FileSink;
pub use crate::core::{
    Batch, BufferView, FlushTrigger, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerStats, MessageEntry, Record, Result, RingArena, Sink, TimestampFormat,
};

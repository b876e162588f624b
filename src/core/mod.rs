//! Core logger types and traits

pub mod config;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod message_entry;
mod record_writer;
pub mod ring_arena;
pub mod sink;
pub mod stats;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::{FlushTrigger, Logger, LoggerBuilder};
pub use message_entry::{Batch, MessageEntry, Record};
pub use ring_arena::{BufferView, RingArena};
pub use sink::{fill_scratch, Sink, RECORD_SEPARATOR};
pub use stats::LoggerStats;
pub use timestamp::{TimestampCache, TimestampFormat};

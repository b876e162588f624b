//! Sink implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "console")]
pub use console::{default_level_colors, ConsoleSink};
#[cfg(feature = "file")]
pub use file::FileSink;

pub use crate::core::Sink;

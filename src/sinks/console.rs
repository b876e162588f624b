//! Console sink implementation

use crate::core::{fill_scratch, Batch, LogLevel, Result, Sink, RECORD_SEPARATOR};
use colored::{Color, Colorize};
use std::collections::HashMap;
use std::io::Write;

/// Colour of each level unless replaced with [`ConsoleSink::with_level_colors`]
pub fn default_level_colors() -> HashMap<LogLevel, Color> {
    LogLevel::ALL
        .into_iter()
        .map(|level| {
            let color = match level {
                LogLevel::Trace => Color::BrightBlack,
                LogLevel::Debug => Color::Blue,
                LogLevel::Info => Color::Green,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Error => Color::Red,
                LogLevel::Fatal => Color::BrightRed,
            };
            (level, color)
        })
        .collect()
}

/// Writes each batch to stdout in a single call, colouring records by level.
pub struct ConsoleSink {
    min_level: LogLevel,
    use_colors: bool,
    colors: HashMap<LogLevel, Color>,
}

impl ConsoleSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            use_colors: true,
            colors: default_level_colors(),
        }
    }

    /// Replace the level-to-colour map. Levels missing from `colors` are
    /// written uncoloured.
    ///
    /// # Example
    ///
    /// ```
    /// use arena_logger::sinks::ConsoleSink;
    /// use arena_logger::LogLevel;
    /// use colored::Color;
    /// use std::collections::HashMap;
    ///
    /// let colors = HashMap::from([
    ///     (LogLevel::Warn, Color::Magenta),
    ///     (LogLevel::Error, Color::BrightRed),
    /// ]);
    /// let sink = ConsoleSink::new(LogLevel::Info).with_level_colors(colors);
    /// ```
    #[must_use]
    pub fn with_level_colors(mut self, colors: HashMap<LogLevel, Color>) -> Self {
        self.colors = colors;
        self
    }

    /// Enable or disable ANSI colours
    ///
    /// # Example
    ///
    /// ```
    /// use arena_logger::sinks::ConsoleSink;
    /// use arena_logger::LogLevel;
    ///
    /// let sink = ConsoleSink::new(LogLevel::Info).with_colors(false);
    /// ```
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn fill_colored(&self, batch: &Batch<'_>, scratch: &mut Vec<u8>) {
        scratch.clear();
        for record in batch.iter().filter(|record| self.should_accept(record.level)) {
            match self.colors.get(&record.level) {
                Some(&color) => {
                    let line = record.as_str_lossy().color(color);
                    scratch.extend_from_slice(line.to_string().as_bytes());
                }
                None => scratch.extend_from_slice(record.bytes),
            }
            scratch.extend_from_slice(RECORD_SEPARATOR);
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(LogLevel::Trace)
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn write_batch(&mut self, batch: &Batch<'_>, scratch: &mut Vec<u8>) -> Result<()> {
        if self.use_colors {
            self.fill_colored(batch, scratch);
        } else {
            fill_scratch(batch, scratch, |level| self.should_accept(level));
        }

        if scratch.is_empty() {
            return Ok(());
        }
        self.write_bytes(scratch)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        std::io::stdout().lock().write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }
}

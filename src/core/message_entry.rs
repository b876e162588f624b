//! Queue entries and the batch view handed to sinks

use super::log_level::LogLevel;
use super::ring_arena::{BufferView, RingArena};
use std::borrow::Cow;

/// A queued record: an arena range plus how much of it was written.
///
/// The arena owns the bytes. The entry is only valid between allocation and
/// the flush that releases it.
#[derive(Debug)]
pub struct MessageEntry {
    view: BufferView,
    length: usize,
    level: LogLevel,
}

impl MessageEntry {
    pub fn new(view: BufferView, length: usize, level: LogLevel) -> Self {
        let length = length.min(view.len());
        Self {
            view,
            length,
            level,
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Number of formatted bytes at the start of the view
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn view(&self) -> &BufferView {
        &self.view
    }

    /// Record how many bytes were formatted, once formatting has finished
    pub(crate) fn set_length(&mut self, length: usize) {
        self.length = length.min(self.view.len());
    }

    pub(crate) fn into_view(self) -> BufferView {
        self.view
    }
}

/// One formatted record as seen by a sink
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: LogLevel,
    pub bytes: &'a [u8],
}

impl<'a> Record<'a> {
    /// The record text, with any byte sequence cut by truncation replaced
    pub fn as_str_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

/// The queue contents of one flush, in arrival order.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    arena: &'a RingArena,
    entries: &'a [MessageEntry],
}

impl<'a> Batch<'a> {
    pub fn new(arena: &'a RingArena, entries: &'a [MessageEntry]) -> Self {
        Self { arena, entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in queue order. Entries whose formatting never completed
    /// have length zero and are skipped.
    pub fn iter(&self) -> impl Iterator<Item = Record<'a>> + 'a {
        let arena = self.arena;
        let entries = self.entries;
        entries
            .iter()
            .filter(|entry| entry.length > 0)
            .map(move |entry| Record {
                level: entry.level,
                bytes: &arena.bytes(&entry.view)[..entry.length],
            })
    }
}

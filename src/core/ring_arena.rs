//! Fixed-capacity ring allocator backing every in-flight log record
//!
//! The arena hands out contiguous byte ranges and takes them back strictly in
//! the order they were handed out. Records are always flushed oldest first, so
//! this is all the bookkeeping the logger needs: two offsets and a flag,
//! with no free list.
//!
//! A request that does not fit between `head` and the end of the store wraps
//! to offset 0 instead of being split. The unused end of the store is
//! remembered as the wrap point and skipped when `tail` reaches it.

use super::error::{LoggerError, Result};

/// A non-owning handle to a reserved range of the arena.
///
/// Views are deliberately not `Clone`: handing one back to
/// [`RingArena::release_buffer`] consumes it, so a range can only be
/// released once.
#[derive(Debug, PartialEq, Eq)]
pub struct BufferView {
    offset: usize,
    len: usize,
}

impl BufferView {
    /// Start of the range within the arena
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the range
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Ring allocator over a single boxed byte slice.
///
/// Owned bytes are exactly `[tail, head)` modulo wraparound, plus the
/// skipped end-gap while a wrap is pending.
///
/// # Example
///
/// ```
/// use arena_logger::core::RingArena;
///
/// let mut arena = RingArena::new(64);
/// let first = arena.request_buffer(32).unwrap();
/// let second = arena.request_buffer(32).unwrap();
/// assert_eq!(arena.available(), 0);
/// assert!(arena.request_buffer(1).is_none());
///
/// arena.release_buffer(first).unwrap();
/// arena.release_buffer(second).unwrap();
/// assert_eq!(arena.available(), 64);
/// ```
#[derive(Debug)]
pub struct RingArena {
    buffer: Box<[u8]>,
    head: usize,
    tail: usize,
    full: bool,
    wrap_point: Option<usize>,
}

impl RingArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            full: false,
            wrap_point: None,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Reserve `size` contiguous bytes, or `None` if there is no room.
    ///
    /// Tries the space at `head` first, then wraps to offset 0 when the
    /// wrapped range stays clear of `tail`. Zero-sized and over-capacity
    /// requests always fail.
    pub fn request_buffer(&mut self, size: usize) -> Option<BufferView> {
        let capacity = self.capacity();
        if size == 0 || size > capacity || self.full {
            return None;
        }

        let offset = if self.head >= self.tail {
            if capacity - self.head >= size {
                self.head
            } else if self.tail >= size {
                self.wrap_point = Some(self.head);
                0
            } else {
                return None;
            }
        } else if self.tail - self.head >= size {
            self.head
        } else {
            return None;
        };

        self.head = (offset + size) % capacity;
        if self.head == self.tail {
            self.full = true;
        }

        Some(BufferView { offset, len: size })
    }

    /// Return the oldest outstanding range to the arena.
    ///
    /// Fails with [`LoggerError::ReleaseOrderViolation`] if `view` is not the
    /// range that starts at `tail`; the arena is left untouched in that case.
    pub fn release_buffer(&mut self, view: BufferView) -> Result<()> {
        if self.is_empty() || view.offset != self.tail {
            return Err(LoggerError::release_order(self.tail, view.offset));
        }

        self.tail = view.end() % self.capacity();
        self.full = false;

        if self.wrap_point == Some(self.tail) {
            self.tail = 0;
            self.wrap_point = None;
        }

        if self.head == self.tail {
            self.head = 0;
            self.tail = 0;
            self.wrap_point = None;
        }

        Ok(())
    }

    /// Total free bytes. Not necessarily contiguous.
    pub fn available(&self) -> usize {
        if self.full {
            0
        } else if self.head >= self.tail {
            self.capacity() - (self.head - self.tail)
        } else {
            self.tail - self.head
        }
    }

    #[inline]
    pub fn bytes(&self, view: &BufferView) -> &[u8] {
        &self.buffer[view.offset..view.end()]
    }

    #[inline]
    pub fn bytes_mut(&mut self, view: &BufferView) -> &mut [u8] {
        &mut self.buffer[view.offset..view.end()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena_is_empty() {
        let arena = RingArena::new(128);
        assert!(arena.is_empty());
        assert!(!arena.is_full());
        assert_eq!(arena.capacity(), 128);
        assert_eq!(arena.available(), 128);
    }

    #[test]
    fn test_sequential_requests_are_contiguous() {
        let mut arena = RingArena::new(100);
        let a = arena.request_buffer(30).unwrap();
        let b = arena.request_buffer(30).unwrap();
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 30);
        assert_eq!(arena.available(), 40);
    }

    #[test]
    fn test_rejects_zero_and_oversized_requests() {
        let mut arena = RingArena::new(16);
        assert!(arena.request_buffer(0).is_none());
        assert!(arena.request_buffer(17).is_none());
        assert_eq!(arena.available(), 16);
    }

    #[test]
    fn test_full_arena_reports_zero_available() {
        let mut arena = RingArena::new(64);
        let a = arena.request_buffer(32).unwrap();
        let _b = arena.request_buffer(32).unwrap();

        // head wrapped back onto tail
        assert!(arena.is_full());
        assert_eq!(arena.available(), 0);
        assert!(arena.request_buffer(1).is_none());

        arena.release_buffer(a).unwrap();
        assert!(!arena.is_full());
        assert_eq!(arena.available(), 32);
        assert_eq!(arena.request_buffer(32).unwrap().offset(), 0);
    }

    #[test]
    fn test_wrap_skips_unusable_tail_space() {
        let mut arena = RingArena::new(100);
        let a = arena.request_buffer(40).unwrap();
        let b = arena.request_buffer(40).unwrap();
        arena.release_buffer(a).unwrap();

        // 20 bytes left at the end, 40 free at the front
        let c = arena.request_buffer(30).unwrap();
        assert_eq!(c.offset(), 0);
        assert_eq!(arena.available(), 10);

        arena.release_buffer(b).unwrap();
        assert_eq!(arena.available(), 70);

        arena.release_buffer(c).unwrap();
        assert!(arena.is_empty());
        assert_eq!(arena.available(), 100);
    }

    #[test]
    fn test_wrap_refused_when_it_would_overrun_tail() {
        let mut arena = RingArena::new(100);
        let a = arena.request_buffer(20).unwrap();
        let _b = arena.request_buffer(70).unwrap();
        arena.release_buffer(a).unwrap();

        // 10 bytes at the end, 20 at the front: 25 fits in neither
        assert!(arena.request_buffer(25).is_none());
        assert_eq!(arena.request_buffer(20).unwrap().offset(), 0);
    }

    #[test]
    fn test_request_between_head_and_tail() {
        let mut arena = RingArena::new(100);
        let a = arena.request_buffer(50).unwrap();
        let b = arena.request_buffer(50).unwrap();
        arena.release_buffer(a).unwrap();

        let c = arena.request_buffer(20).unwrap();
        assert_eq!(c.offset(), 0);
        assert!(arena.request_buffer(31).is_none());
        let d = arena.request_buffer(30).unwrap();
        assert_eq!(d.offset(), 20);
        assert!(arena.is_full());

        arena.release_buffer(b).unwrap();
        arena.release_buffer(c).unwrap();
        arena.release_buffer(d).unwrap();
        assert_eq!(arena.available(), 100);
    }

    #[test]
    fn test_release_out_of_order_is_rejected() {
        let mut arena = RingArena::new(64);
        let _a = arena.request_buffer(16).unwrap();
        let b = arena.request_buffer(16).unwrap();

        let err = arena.release_buffer(b).unwrap_err();
        assert!(matches!(
            err,
            LoggerError::ReleaseOrderViolation {
                expected: 0,
                found: 16
            }
        ));
        assert_eq!(arena.available(), 32);
    }

    #[test]
    fn test_release_on_empty_arena_is_rejected() {
        let mut a = RingArena::new(32);
        let mut b = RingArena::new(32);
        let foreign = b.request_buffer(8).unwrap();
        assert!(a.release_buffer(foreign).is_err());
    }

    #[test]
    fn test_bytes_are_scoped_to_view() {
        let mut arena = RingArena::new(8);
        let a = arena.request_buffer(4).unwrap();
        let b = arena.request_buffer(4).unwrap();
        arena.bytes_mut(&a).copy_from_slice(b"abcd");
        arena.bytes_mut(&b).copy_from_slice(b"efgh");
        assert_eq!(arena.bytes(&a), b"abcd");
        assert_eq!(arena.bytes(&b), b"efgh");
    }
}

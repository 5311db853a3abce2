//! Fixed-capacity circular storage backing the channel.
//!
//! The ring itself is not synchronized. [`BoundedChannel`](crate::BoundedChannel)
//! keeps it behind a mutex and only touches it with the lock held.
//!
//! ```text
//!            head              tail
//!             │                 │
//!             ▼                 ▼
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │None │  A  │  B  │  C  │  D  │None │None │None │   len = 4
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//! ```
//!
//! Occupied slots are exactly `[head, head + len)` modulo capacity; every
//! other slot is `None`.

/// Circular buffer of `Option<T>` slots with head/tail/len bookkeeping.
pub(crate) struct Ring<T> {
    slots: Box<[Option<T>]>,
    /// Oldest occupied slot, next to be popped.
    head: usize,
    /// Next free slot, next to be written.
    tail: usize,
    len: usize,
}

impl<T> Ring<T> {
    /// Allocates a ring with exactly `capacity` empty slots.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "ring capacity must be non-zero");

        let slots: Box<[Option<T>]> = (0..capacity).map(|_| None).collect();

        Self {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Writes `value` into the tail slot.
    ///
    /// The caller must have checked `!is_full()`.
    pub(crate) fn push_back(&mut self, value: T) {
        debug_assert!(!self.is_full(), "push_back on a full ring");

        let slot = &mut self.slots[self.tail];
        debug_assert!(slot.is_none(), "tail slot {} is occupied", self.tail);
        *slot = Some(value);

        self.tail = self.wrap(self.tail + 1);
        self.len += 1;
        self.debug_check();
    }

    /// Takes the value out of the head slot, or `None` if the ring is empty.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slots[self.head].take();
        debug_assert!(value.is_some(), "head slot {} is vacant", self.head);

        self.head = self.wrap(self.head + 1);
        self.len -= 1;
        self.debug_check();

        value
    }

    #[inline]
    fn wrap(&self, index: usize) -> usize {
        if index == self.capacity() { 0 } else { index }
    }

    #[inline]
    fn debug_check(&self) {
        let cap = self.capacity();
        debug_assert!(self.len <= cap, "len {} exceeds capacity {cap}", self.len);
        debug_assert_eq!(
            (self.tail + cap - self.head) % cap,
            self.len % cap,
            "head/tail disagree with len"
        );
    }
}

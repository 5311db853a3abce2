//! A bounded, blocking FIFO channel shared by many producers and consumers.
//!
//! [`BoundedChannel`] owns a fixed-capacity circular buffer behind a single
//! mutex, plus two condition variables: `not_full` (producers wait here when
//! the buffer is full) and `not_empty` (consumers wait here when it is empty).
//! Unlike an SPSC channel there are no split halves: the channel is shared by
//! reference (usually through an [`Arc`](std::sync::Arc)) and every method
//! takes `&self`.
//!
//! # Wait/Signal Protocol
//!
//! ```text
//! push(item):                          pop():
//! ─────────────────────────            ─────────────────────────
//! lock                                 lock
//! while full && !closed:               while empty && !closed:
//!     wait(not_full)   ◄─────┐             wait(not_empty)  ◄───┐
//! if closed: return Err(item)│         if empty: return Err     │
//! ring[tail] = item          │         item = ring[head]        │
//! tail += 1, len += 1        │         head += 1, len -= 1      │
//! unlock                     │         unlock                   │
//! notify_one(not_empty) ─────┼─────────────────────────────────►┘
//!                            └──────── notify_one(not_full)
//! ```
//!
//! Waiting atomically releases the lock while parked and reacquires it on
//! wake. A woken thread always re-tests its predicate before proceeding:
//! with several producers or consumers a third thread may take the freed
//! slot (or the new item) between the notify and the wake.
//!
//! Each push wakes at most one consumer and each pop wakes at most one
//! producer, so no thundering herd on the hot path. [`close`](BoundedChannel::close)
//! is the only broadcast.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use depot_channel::BoundedChannel;
//!
//! let channel = Arc::new(BoundedChannel::<u64>::new(8).unwrap());
//!
//! let producer = {
//!     let channel = Arc::clone(&channel);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             // Blocks while all 8 slots are occupied
//!             channel.push(i).unwrap();
//!         }
//!     })
//! };
//!
//! let mut sum = 0;
//! for _ in 0..100 {
//!     // Blocks while the channel is empty
//!     sum += channel.pop().unwrap();
//! }
//!
//! producer.join().unwrap();
//! assert_eq!(sum, 99 * 100 / 2);
//! ```
//!
//! # Non-blocking and Bounded Waits
//!
//! ```
//! use std::time::Duration;
//!
//! use depot_channel::{BoundedChannel, PopTimeoutError, TryPopError, TryPushError};
//!
//! let channel = BoundedChannel::<u32>::new(8).unwrap();
//!
//! for i in 0..8 {
//!     channel.try_push(i).unwrap();
//! }
//! assert!(matches!(channel.try_push(8), Err(TryPushError::Full(8))));
//!
//! for i in 0..8 {
//!     assert_eq!(channel.try_pop().unwrap(), i);
//! }
//! assert!(matches!(channel.try_pop(), Err(TryPopError::Empty)));
//!
//! let err = channel.pop_timeout(Duration::from_millis(10)).unwrap_err();
//! assert_eq!(err, PopTimeoutError::Timeout);
//! ```
//!
//! # Closing
//!
//! A channel that is never closed blocks forever, exactly like a plain
//! monitor queue. [`close`](BoundedChannel::close) ends the session:
//!
//! - producers (blocked or not) get their item back in a [`PushError`];
//! - consumers keep receiving whatever is still buffered, then get
//!   [`PopError`].
//!
//! ```
//! use depot_channel::{BoundedChannel, PopError};
//!
//! let channel = BoundedChannel::<&str>::new(8).unwrap();
//!
//! channel.push("first").unwrap();
//! channel.push("second").unwrap();
//! assert!(channel.close());
//!
//! assert_eq!(channel.push("late").unwrap_err().into_inner(), "late");
//!
//! // Already-queued items are still delivered
//! assert_eq!(channel.pop().unwrap(), "first");
//! assert_eq!(channel.pop().unwrap(), "second");
//! assert_eq!(channel.pop(), Err(PopError));
//! ```
//!
//! # Capacity
//!
//! Capacity is exact (no power-of-two rounding) and must be at least
//! [`MIN_CAPACITY`]. Smaller values are rejected at construction with a
//! [`CapacityError`] before anything is allocated.
//!
//! # When to Use This
//!
//! Use `depot_channel` when:
//! - Any number of producer and consumer threads share one buffer
//! - Producers should stall (not fail, not drop) when consumers fall behind
//! - Strict FIFO across all producers matters
//!
//! Consider alternatives when:
//! - There is exactly one producer and one consumer → a lock-free SPSC ring
//! - You need `select!` → `crossbeam-channel`
//! - You need async/await → `tokio::sync::mpsc`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod ring;

use core::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use ring::Ring;

/// Smallest capacity [`BoundedChannel::new`] accepts.
pub const MIN_CAPACITY: usize = 8;

/// State guarded by the channel mutex.
struct State<T> {
    ring: Ring<T>,
    closed: bool,
}

/// A fixed-capacity, thread-safe FIFO buffer with blocking push and pop.
///
/// Share it between threads with an [`Arc`](std::sync::Arc) (or scoped
/// borrows). The channel never inspects, clones or reorders items: they are
/// moved in by [`push`](Self::push) and moved out by [`pop`](Self::pop) in
/// insertion order.
///
/// # Example
///
/// ```
/// use depot_channel::BoundedChannel;
///
/// let channel = BoundedChannel::new(8).unwrap();
///
/// channel.push('a').unwrap();
/// channel.push('b').unwrap();
///
/// assert_eq!(channel.len(), 2);
/// assert_eq!(channel.pop().unwrap(), 'a');
/// assert_eq!(channel.pop().unwrap(), 'b');
/// ```
pub struct BoundedChannel<T> {
    state: Mutex<State<T>>,
    /// Signalled when a slot frees up.
    not_full: Condvar,
    /// Signalled when an item arrives.
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedChannel<T> {
    /// Creates an empty channel holding at most `capacity` items.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is below [`MIN_CAPACITY`].
    ///
    /// # Example
    ///
    /// ```
    /// use depot_channel::{BoundedChannel, MIN_CAPACITY};
    ///
    /// assert!(BoundedChannel::<u8>::new(MIN_CAPACITY).is_ok());
    ///
    /// let err = BoundedChannel::<u8>::new(7).unwrap_err();
    /// assert_eq!(err.requested, 7);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity < MIN_CAPACITY {
            return Err(CapacityError {
                requested: capacity,
                minimum: MIN_CAPACITY,
            });
        }

        Ok(Self {
            state: Mutex::new(State {
                ring: Ring::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// Pushes an item, blocking while the channel is full.
    ///
    /// On an open channel this only returns once the item is stored and
    /// visible to subsequent pops. Wakes at most one blocked consumer.
    ///
    /// # Errors
    ///
    /// Returns `Err(PushError(item))` if the channel is closed, either before
    /// the call or while it was waiting for room. The item is never stored
    /// in that case.
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        let mut state = self.state.lock();

        while state.ring.is_full() && !state.closed {
            self.not_full.wait(&mut state);
        }

        if state.closed {
            return Err(PushError(item));
        }

        self.store(state, item);
        Ok(())
    }

    /// Attempts to push an item without blocking.
    ///
    /// # Errors
    ///
    /// - `Err(TryPushError::Full(item))` if every slot is occupied
    /// - `Err(TryPushError::Closed(item))` if the channel is closed
    ///
    /// # Example
    ///
    /// ```
    /// use depot_channel::{BoundedChannel, TryPushError};
    ///
    /// let channel = BoundedChannel::<u8>::new(8).unwrap();
    /// for i in 0..8 {
    ///     channel.try_push(i).unwrap();
    /// }
    /// assert!(matches!(channel.try_push(8), Err(TryPushError::Full(8))));
    /// ```
    pub fn try_push(&self, item: T) -> Result<(), TryPushError<T>> {
        let state = self.state.lock();

        if state.closed {
            return Err(TryPushError::Closed(item));
        }
        if state.ring.is_full() {
            return Err(TryPushError::Full(item));
        }

        self.store(state, item);
        Ok(())
    }

    /// Pushes an item, blocking for at most `timeout` while the channel is full.
    ///
    /// The wait is deadline-based: spurious or stolen wakeups do not extend
    /// it. Room that appears at the very end of the wait is still used.
    ///
    /// # Errors
    ///
    /// - `Err(PushTimeoutError::Timeout(item))` if no slot freed up in time
    /// - `Err(PushTimeoutError::Closed(item))` if the channel is closed
    pub fn push_timeout(&self, item: T, timeout: Duration) -> Result<(), PushTimeoutError<T>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            // Too far in the future to represent: same as waiting forever
            return self
                .push(item)
                .map_err(|PushError(item)| PushTimeoutError::Closed(item));
        };

        let mut state = self.state.lock();

        while state.ring.is_full() && !state.closed {
            if self.not_full.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        if state.closed {
            return Err(PushTimeoutError::Closed(item));
        }
        if state.ring.is_full() {
            return Err(PushTimeoutError::Timeout(item));
        }

        self.store(state, item);
        Ok(())
    }

    /// Pops the oldest item, blocking while the channel is empty.
    ///
    /// Wakes at most one blocked producer.
    ///
    /// # Errors
    ///
    /// Returns `Err(PopError)` only if the channel is closed **and** drained.
    /// Items pushed before [`close`](Self::close) are always delivered first.
    pub fn pop(&self) -> Result<T, PopError> {
        let mut state = self.state.lock();

        while state.ring.is_empty() && !state.closed {
            self.not_empty.wait(&mut state);
        }

        self.take(state).ok_or(PopError)
    }

    /// Attempts to pop the oldest item without blocking.
    ///
    /// # Errors
    ///
    /// - `Err(TryPopError::Empty)` if the channel is open but empty
    /// - `Err(TryPopError::Closed)` if the channel is closed and drained
    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let state = self.state.lock();
        let closed = state.closed;

        self.take(state).ok_or(if closed {
            TryPopError::Closed
        } else {
            TryPopError::Empty
        })
    }

    /// Pops the oldest item, blocking for at most `timeout` while empty.
    ///
    /// # Errors
    ///
    /// - `Err(PopTimeoutError::Timeout)` if nothing arrived in time
    /// - `Err(PopTimeoutError::Closed)` if the channel is closed and drained
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use depot_channel::{BoundedChannel, PopTimeoutError};
    ///
    /// let channel = BoundedChannel::<u8>::new(8).unwrap();
    /// assert_eq!(
    ///     channel.pop_timeout(Duration::from_millis(5)),
    ///     Err(PopTimeoutError::Timeout)
    /// );
    /// ```
    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, PopTimeoutError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.pop().map_err(|PopError| PopTimeoutError::Closed);
        };

        let mut state = self.state.lock();

        while state.ring.is_empty() && !state.closed {
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }

        let closed = state.closed;
        self.take(state).ok_or(if closed {
            PopTimeoutError::Closed
        } else {
            PopTimeoutError::Timeout
        })
    }

    /// Closes the channel and wakes every blocked producer and consumer.
    ///
    /// After closing, pushes fail and hand the item back; pops drain the
    /// remaining items and then fail. Returns `true` if this call closed the
    /// channel, `false` if it was already closed.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        drop(state);

        self.not_full.notify_all();
        self.not_empty.notify_all();
        true
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of items currently buffered.
    ///
    /// This is a snapshot: other threads may change it as soon as the lock
    /// is released.
    pub fn len(&self) -> usize {
        self.state.lock().ring.len()
    }

    /// Returns `true` if no items are buffered.
    pub fn is_empty(&self) -> bool {
        self.state.lock().ring.is_empty()
    }

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.state.lock().ring.is_full()
    }

    /// Maximum number of items the channel can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes into the tail slot, releases the lock, then wakes one consumer.
    fn store(&self, mut state: MutexGuard<'_, State<T>>, item: T) {
        state.ring.push_back(item);
        drop(state);
        self.not_empty.notify_one();
    }

    /// Takes from the head slot, releases the lock, then wakes one producer.
    fn take(&self, mut state: MutexGuard<'_, State<T>>) -> Option<T> {
        let item = state.ring.pop_front()?;
        drop(state);
        self.not_full.notify_one();
        Some(item)
    }
}

impl<T> fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedChannel")
            .field("capacity", &self.capacity)
            .field("len", &state.ring.len())
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error returned by [`BoundedChannel::new`] for a capacity below
/// [`MIN_CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// The capacity that was asked for.
    pub requested: usize,
    /// The smallest capacity accepted.
    pub minimum: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel capacity {} is below the minimum of {}",
            self.requested, self.minimum
        )
    }
}

impl std::error::Error for CapacityError {}

/// Error returned when [`BoundedChannel::push`] fails because the channel
/// is closed.
///
/// Contains the item that could not be pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
    /// Returns the item that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel closed")
    }
}

impl<T: fmt::Debug> std::error::Error for PushError<T> {}

/// Error returned when [`BoundedChannel::pop`] fails because the channel is
/// closed and no items remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopError;

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel closed")
    }
}

impl std::error::Error for PopError {}

/// Error returned by [`BoundedChannel::try_push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPushError<T> {
    /// The channel is full but still open.
    ///
    /// The item is returned so it can be retried.
    Full(T),

    /// The channel is closed.
    Closed(T),
}

impl<T> TryPushError<T> {
    /// Returns the item that could not be pushed.
    pub fn into_inner(self) -> T {
        match self {
            TryPushError::Full(v) | TryPushError::Closed(v) => v,
        }
    }

    /// Returns `true` if this error is the `Full` variant.
    pub fn is_full(&self) -> bool {
        matches!(self, TryPushError::Full(_))
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, TryPushError::Closed(_))
    }
}

impl<T> fmt::Display for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryPushError::Full(_) => write!(f, "channel full"),
            TryPushError::Closed(_) => write!(f, "channel closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for TryPushError<T> {}

/// Error returned by [`BoundedChannel::try_pop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPopError {
    /// The channel is empty but still open.
    Empty,

    /// The channel is closed and no items remain.
    Closed,
}

impl TryPopError {
    /// Returns `true` if this error is the `Empty` variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, TryPopError::Empty)
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, TryPopError::Closed)
    }
}

impl fmt::Display for TryPopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryPopError::Empty => write!(f, "channel empty"),
            TryPopError::Closed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for TryPopError {}

/// Error returned by [`BoundedChannel::push_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTimeoutError<T> {
    /// No slot freed up before the timeout elapsed.
    Timeout(T),

    /// The channel is closed.
    Closed(T),
}

impl<T> PushTimeoutError<T> {
    /// Returns the item that could not be pushed.
    pub fn into_inner(self) -> T {
        match self {
            PushTimeoutError::Timeout(v) | PushTimeoutError::Closed(v) => v,
        }
    }

    /// Returns `true` if this error is the `Timeout` variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PushTimeoutError::Timeout(_))
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, PushTimeoutError::Closed(_))
    }
}

impl<T> fmt::Display for PushTimeoutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushTimeoutError::Timeout(_) => write!(f, "timed out waiting for room"),
            PushTimeoutError::Closed(_) => write!(f, "channel closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for PushTimeoutError<T> {}

/// Error returned by [`BoundedChannel::pop_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopTimeoutError {
    /// Nothing arrived before the timeout elapsed.
    Timeout,

    /// The channel is closed and no items remain.
    Closed,
}

impl PopTimeoutError {
    /// Returns `true` if this error is the `Timeout` variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PopTimeoutError::Timeout)
    }

    /// Returns `true` if this error is the `Closed` variant.
    pub fn is_closed(&self) -> bool {
        matches!(self, PopTimeoutError::Closed)
    }
}

impl fmt::Display for PopTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopTimeoutError::Timeout => write!(f, "timed out waiting for an item"),
            PopTimeoutError::Closed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for PopTimeoutError {}

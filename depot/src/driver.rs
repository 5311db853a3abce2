//! Producer and consumer loops around a shared [`BoundedChannel`].
//!
//! The loops are generic over the item type. They know nothing about
//! vehicles; [`Session`](crate::Session) plugs in the fleet-specific
//! closures.
//!
//! Stop protocol:
//!
//! ```text
//! 1. trigger shutdown   producers finish their current push and exit
//! 2. join producers
//! 3. close channel      consumers drain what is left, then pop() fails
//! 4. join consumers
//! ```
//!
//! Consumers never exit on the shutdown signal alone: a producer blocked in
//! `push` on a full channel needs them to keep popping.

use depot_channel::BoundedChannel;
use rand::Rng;
use tracing::debug;

use crate::pause::Pause;
use crate::shutdown::Shutdown;

/// What a producer loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    /// Items successfully pushed.
    pub produced: u64,
}

/// What a consumer loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Items popped and handed to the handler.
    pub consumed: u64,
}

/// Pushes items built by `make` until shutdown is requested or the channel
/// closes, pausing between items.
///
/// An item rejected by a closed channel is dropped and not counted.
pub fn run_producer<T, R, F>(
    channel: &BoundedChannel<T>,
    mut make: F,
    pause: Pause,
    rng: &mut R,
    shutdown: &Shutdown,
) -> ProducerReport
where
    R: Rng,
    F: FnMut(&mut R) -> T,
{
    let mut report = ProducerReport::default();

    while !shutdown.is_requested() {
        let item = make(rng);
        if channel.push(item).is_err() {
            debug!("warehouse closed, producer stopping");
            break;
        }
        report.produced += 1;

        if shutdown.sleep(pause.sample(rng)) {
            break;
        }
    }

    report
}

/// Pops items into `handle` until the channel is closed and drained.
///
/// Pauses between items while the session is running; once shutdown is
/// requested it drains without pausing.
pub fn run_consumer<T, R, F>(
    channel: &BoundedChannel<T>,
    mut handle: F,
    pause: Pause,
    rng: &mut R,
    shutdown: &Shutdown,
) -> ConsumerReport
where
    R: Rng,
    F: FnMut(T),
{
    let mut report = ConsumerReport::default();

    while let Ok(item) = channel.pop() {
        handle(item);
        report.consumed += 1;

        if !shutdown.is_requested() {
            shutdown.sleep(pause.sample(rng));
        }
    }

    debug!("warehouse closed and drained, consumer stopping");
    report
}

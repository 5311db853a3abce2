//! Cancellation token for driver loops.
//!
//! Built on a `crossbeam-channel` that never carries a message: dropping the
//! only sender disconnects every receiver at once, which both polls cheaply
//! (`try_recv`) and interrupts a sleeping driver (`recv_timeout`).

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};

/// Creates a linked trigger/token pair.
///
/// Clone the [`Shutdown`] token into every driver; keep the
/// [`ShutdownTrigger`] with whoever decides when to stop.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// let (trigger, token) = depot::shutdown();
///
/// assert!(!token.is_requested());
/// assert!(!token.sleep(Duration::from_millis(1)));
///
/// trigger.trigger();
/// assert!(token.is_requested());
/// // Returns immediately once shutdown is requested
/// assert!(token.sleep(Duration::from_secs(3600)));
/// ```
pub fn shutdown() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = bounded(0);
    (ShutdownTrigger { _tx: tx }, Shutdown { rx })
}

/// Requests shutdown when triggered or dropped.
#[derive(Debug)]
pub struct ShutdownTrigger {
    _tx: Sender<()>,
}

impl ShutdownTrigger {
    /// Requests shutdown for every linked [`Shutdown`] token.
    pub fn trigger(self) {
        drop(self);
    }
}

/// Observes a shutdown request. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: Receiver<()>,
}

impl Shutdown {
    /// Returns `true` once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleeps for `duration`, waking early if shutdown is requested.
    ///
    /// Returns `true` if shutdown was requested (before or during the sleep).
    pub fn sleep(&self, duration: Duration) -> bool {
        match self.rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => false,
            // Nothing is ever sent, so `Ok` cannot happen; treat it as a request
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }
}

//! Single-slot trigger signal shared by the listener and the trigger loop
//!
//! Backed by a `tokio::sync::watch` channel holding one bool. Setting an
//! already-set signal changes nothing and wakes nobody, so triggers are
//! never queued.

use std::sync::Arc;

use tokio::sync::watch;

/// Producer-side handle; cheap to clone and usable from any thread
#[derive(Debug, Clone)]
pub struct TriggerSignal {
    tx: Arc<watch::Sender<bool>>,
}

/// The single consumer of a [`TriggerSignal`]
#[derive(Debug)]
pub struct TriggerWaiter {
    rx: watch::Receiver<bool>,
}

/// Returned by [`TriggerWaiter::wait`] once every [`TriggerSignal`] is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("trigger signal closed")]
pub struct SignalClosed;

impl TriggerSignal {
    /// Create a cleared signal and its only waiter
    pub fn new() -> (Self, TriggerWaiter) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, TriggerWaiter { rx })
    }

    /// Set the signal. Returns false if it was already set.
    pub fn set(&self) -> bool {
        self.tx.send_if_modified(|set| !std::mem::replace(set, true))
    }

    /// Clear the signal. Returns false if it was already clear.
    pub fn clear(&self) -> bool {
        self.tx.send_if_modified(|set| std::mem::replace(set, false))
    }

    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    /// Clear the signal when the returned guard is dropped
    pub fn clear_on_drop(&self) -> ClearGuard<'_> {
        ClearGuard { signal: self }
    }
}

impl TriggerWaiter {
    /// Wait until the signal is set. Returns immediately if it already is;
    /// the signal stays set until someone clears it.
    pub async fn wait(&mut self) -> Result<(), SignalClosed> {
        self.rx
            .wait_for(|set| *set)
            .await
            .map(|_| ())
            .map_err(|_| SignalClosed)
    }
}

/// Clears its signal on drop, on every exit path
#[must_use = "the signal is cleared as soon as the guard is dropped"]
pub struct ClearGuard<'a> {
    signal: &'a TriggerSignal,
}

impl Drop for ClearGuard<'_> {
    fn drop(&mut self) {
        self.signal.clear();
    }
}

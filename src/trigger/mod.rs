//! Trigger module: the signal between listener and playback, and the loop
//! that serves it
//!
//! The listener thread sets a [`TriggerSignal`]; the [`TriggerLoop`] waits
//! on it, plays the configured sequence and clears it again.

mod machine;
mod signal;

pub use machine::{State, TriggerLoop};
pub use signal::{ClearGuard, SignalClosed, TriggerSignal, TriggerWaiter};

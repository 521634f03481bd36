//! Trigger loop state machine
//!
//! Cycles Idle -> Triggered -> Executing -> Idle for the life of the
//! process. The trigger signal is cleared when Executing ends, whether the
//! playback succeeded or not.

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::signal::{TriggerSignal, TriggerWaiter};
use crate::backend::InputBackend;
use crate::events::PlaybackEvent;
use crate::playback::{KeystrokeDirective, PlaybackError, Player};

/// The three states of the trigger loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// Waiting on the trigger signal
    #[default]
    Idle,
    /// Signal observed, not yet cleared
    Triggered,
    /// Playback running
    Executing,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Idle => write!(f, "Idle"),
            State::Triggered => write!(f, "Triggered"),
            State::Executing => write!(f, "Executing"),
        }
    }
}

/// Waits for triggers and plays the configured sequence once per trigger
pub struct TriggerLoop<B> {
    /// Current state
    state: State,
    signal: TriggerSignal,
    waiter: TriggerWaiter,
    player: Player,
    directives: Vec<KeystrokeDirective>,
    /// The only user of the keyboard controller
    backend: B,
    /// Channel for emitting playback events
    event_tx: broadcast::Sender<PlaybackEvent>,
}

impl<B: InputBackend> TriggerLoop<B> {
    /// Create a new trigger loop. `signal` and `waiter` must come from the
    /// same [`TriggerSignal::new`] call.
    pub fn new(
        signal: TriggerSignal,
        waiter: TriggerWaiter,
        player: Player,
        directives: Vec<KeystrokeDirective>,
        backend: B,
        event_tx: broadcast::Sender<PlaybackEvent>,
    ) -> Self {
        Self {
            state: State::Idle,
            signal,
            waiter,
            player,
            directives,
            backend,
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Run the trigger loop until the signal closes
    pub async fn run(&mut self) {
        info!("trigger loop started in Idle state");

        while self.serve_next().await.is_some() {}

        info!("trigger loop stopped");
    }

    /// Wait for one trigger and play the sequence.
    ///
    /// Returns `None` once the signal has closed, otherwise the playback
    /// outcome, which has already been logged and broadcast.
    pub async fn serve_next(&mut self) -> Option<Result<(), PlaybackError>> {
        if self.waiter.wait().await.is_err() {
            return None;
        }
        self.transition_to(State::Triggered);
        self.emit(PlaybackEvent::Triggered);

        self.transition_to(State::Executing);
        let started = Instant::now();
        let outcome = {
            let _clear = self.signal.clear_on_drop();
            self.player.play(&self.directives, &mut self.backend).await
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(()) => {
                info!(duration_ms, "playback complete");
                self.emit(PlaybackEvent::PlaybackComplete {
                    duration_ms,
                    directives: self.directives.len(),
                });
            }
            Err(e) => {
                error!(error = %e, duration_ms, "playback failed");
                self.emit(PlaybackEvent::PlaybackFailed {
                    duration_ms,
                    error: e.to_string(),
                });
            }
        }

        self.transition_to(State::Idle);
        Some(outcome)
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: State) {
        info!(from = %self.state, to = %new_state, "state transition");
        self.state = new_state;
    }

    fn emit(&self, event: PlaybackEvent) {
        debug!(?event, "emitting playback event");
        // no subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

//! Playback of a keystroke sequence

use std::time::Duration;

use tracing::{debug, info};

use super::directive::KeystrokeDirective;
use super::executor::KeystrokeExecutor;
use crate::backend::{InjectionError, InputBackend};

/// Errors that end a playback early
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("keystroke sequence is empty")]
    EmptySequence,

    #[error("directive #{index} ({directive}) failed: {source}")]
    Directive {
        index: usize,
        directive: String,
        #[source]
        source: InjectionError,
    },
}

/// Plays directive sequences through a [`KeystrokeExecutor`]
#[derive(Debug, Clone)]
pub struct Player {
    executor: KeystrokeExecutor,
    pre_delay: Duration,
}

impl Player {
    /// `pre_delay` runs before the first directive of every playback;
    /// the trigger hotkey's own modifiers need time to come back up.
    pub fn new(executor: KeystrokeExecutor, pre_delay: Duration) -> Self {
        Self {
            executor,
            pre_delay,
        }
    }

    /// Play `directives` in order. The first failing directive aborts the
    /// rest of the sequence.
    pub async fn play<B: InputBackend>(
        &self,
        directives: &[KeystrokeDirective],
        backend: &mut B,
    ) -> Result<(), PlaybackError> {
        if directives.is_empty() {
            return Err(PlaybackError::EmptySequence);
        }

        if !self.pre_delay.is_zero() {
            debug!(pre_delay_ms = self.pre_delay.as_millis() as u64, "waiting before playback");
            tokio::time::sleep(self.pre_delay).await;
        }

        info!(directives = directives.len(), "typing keys");

        for (index, directive) in directives.iter().enumerate() {
            match directive {
                KeystrokeDirective::Delay(delay) => {
                    debug!(index, delay_ms = delay.as_millis() as u64, "delay");
                    tokio::time::sleep(*delay).await;
                }
                KeystrokeDirective::Hotkey { hotkey, .. } => {
                    debug!(index, %hotkey, "keystroke");
                    self.executor
                        .execute(hotkey, backend)
                        .map_err(|source| PlaybackError::Directive {
                            index,
                            directive: directive.to_string(),
                            source,
                        })?;
                }
            }
        }

        Ok(())
    }
}

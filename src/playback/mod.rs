//! Playback module: keystroke directives and their execution
//!
//! - `directive`: parsing of `delay <seconds>` and hotkey entries
//! - `executor`: press/release sequencing plus sticky-keys remediation
//! - `player`: runs a whole sequence, fail-fast

mod directive;
mod executor;
mod player;

pub use directive::{DirectiveError, KeystrokeDirective};
pub use executor::{KeystrokeExecutor, StickyKeys};
pub use player::{PlaybackError, Player};

//! Hotkey module: specifier parsing and global keyboard listening
//!
//! Parses `ctrl+alt+tab`-style specifiers into structured hotkeys and
//! watches the physical keyboard (via `rdev`) for the trigger combination.

mod keys;
mod listener;
mod parser;

pub use keys::{Key, Modifier, ModifierState, SpecialKey};
pub use listener::{ComboTracker, HotkeyListener, ListenerError, TriggerCombo};
pub use parser::{parse, MalformedHotkey, MalformedReason, Operand, StructuredHotkey};

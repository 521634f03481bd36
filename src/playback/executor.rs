//! Keystroke execution and sticky-keys remediation
//!
//! A hotkey is typed by holding its modifiers, tapping the operand and
//! releasing the modifiers in reverse order. Under Linux sticky keys the
//! injected events leave the last modifier latched after a non-special
//! operand; [`StickyKeys`] cycles it twice more (latched, locked, unstuck).

use tracing::{debug, warn};

use crate::backend::{InjectionError, InputBackend};
use crate::hotkey::{Key, Modifier, StructuredHotkey};

/// Sticky-keys remediation policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyKeys {
    enabled: bool,
}

impl StickyKeys {
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Resolve a configured request against the running platform.
    /// Remediation only exists for Linux; elsewhere it stays off.
    pub fn for_platform(requested: bool) -> Self {
        if requested && !cfg!(target_os = "linux") {
            warn!("sticky-keys remediation is only supported on Linux, ignoring");
            return Self::disabled();
        }
        Self { enabled: requested }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The modifier left latched after typing `hotkey`, if any
    pub fn latched_modifier(&self, hotkey: &StructuredHotkey) -> Option<Modifier> {
        if !self.enabled || hotkey.operand_is_special() {
            return None;
        }
        hotkey.modifiers().last().copied()
    }

    /// Cycle the latched modifier back to unstuck
    pub fn remediate<B: InputBackend>(
        &self,
        hotkey: &StructuredHotkey,
        backend: &mut B,
    ) -> Result<(), InjectionError> {
        let Some(modifier) = self.latched_modifier(hotkey) else {
            return Ok(());
        };

        debug!(%modifier, "cycling latched modifier");
        // latched -> locked
        backend.tap(Key::Modifier(modifier))?;
        // locked -> unstuck
        backend.tap(Key::Modifier(modifier))
    }
}

/// Types structured hotkeys through an input backend
#[derive(Debug, Clone, Copy, Default)]
pub struct KeystrokeExecutor {
    sticky_keys: StickyKeys,
}

impl KeystrokeExecutor {
    pub fn new(sticky_keys: StickyKeys) -> Self {
        Self { sticky_keys }
    }

    /// Type `hotkey`. Modifiers are always released, even if the operand
    /// fails. Errors are returned as-is, never retried.
    pub fn execute<B: InputBackend>(
        &self,
        hotkey: &StructuredHotkey,
        backend: &mut B,
    ) -> Result<(), InjectionError> {
        let operand = hotkey.operand().key();
        backend.hold(hotkey.modifiers(), |b| b.tap(operand))?;
        self.sticky_keys.remediate(hotkey, backend)
    }
}

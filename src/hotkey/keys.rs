//! Key definitions and modifier state tracking
//!
//! Provides the fixed modifier and special-key tables used by the hotkey
//! parser, the backend-neutral [`Key`] handed to input backends, and a
//! struct for tracking which modifier keys are physically held.

use std::fmt;

/// A modifier key held while the operand key is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Control,
    Alt,
    Super,
    Shift,
}

impl Modifier {
    /// Look up a modifier by its specifier name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Control),
            "alt" => Some(Self::Alt),
            "super" | "cmd" | "command" => Some(Self::Super),
            "shift" => Some(Self::Shift),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Alt => "alt",
            Self::Super => "super",
            Self::Shift => "shift",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operand keys that need an explicit symbolic mapping instead of being
/// typed as a literal character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Tab,
    Left,
    Up,
    Right,
    Down,
    Enter,
    PageUp,
    PageDown,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
}

impl SpecialKey {
    /// Look up a special key by its specifier name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "tab" => Self::Tab,
            "left" => Self::Left,
            "up" => Self::Up,
            "right" => Self::Right,
            "down" => Self::Down,
            "enter" => Self::Enter,
            "page_up" => Self::PageUp,
            "page_down" => Self::PageDown,
            "f1" => Self::F1,
            "f2" => Self::F2,
            "f3" => Self::F3,
            "f4" => Self::F4,
            "f5" => Self::F5,
            "f6" => Self::F6,
            "f7" => Self::F7,
            "f8" => Self::F8,
            "f9" => Self::F9,
            "f10" => Self::F10,
            "f11" => Self::F11,
            "f12" => Self::F12,
            "f13" => Self::F13,
            "f14" => Self::F14,
            "f15" => Self::F15,
            "f16" => Self::F16,
            "f17" => Self::F17,
            "f18" => Self::F18,
            "f19" => Self::F19,
            "f20" => Self::F20,
            _ => return None,
        };
        Some(key)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::Left => "left",
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Enter => "enter",
            Self::PageUp => "page_up",
            Self::PageDown => "page_down",
            Self::F1 => "f1",
            Self::F2 => "f2",
            Self::F3 => "f3",
            Self::F4 => "f4",
            Self::F5 => "f5",
            Self::F6 => "f6",
            Self::F7 => "f7",
            Self::F8 => "f8",
            Self::F9 => "f9",
            Self::F10 => "f10",
            Self::F11 => "f11",
            Self::F12 => "f12",
            Self::F13 => "f13",
            Self::F14 => "f14",
            Self::F15 => "f15",
            Self::F16 => "f16",
            Self::F17 => "f17",
            Self::F18 => "f18",
            Self::F19 => "f19",
            Self::F20 => "f20",
        }
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A key as seen by an input backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Modifier(Modifier),
    Special(SpecialKey),
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Modifier(m) => write!(f, "{}", m),
            Key::Special(k) => write!(f, "{}", k),
            Key::Char(c) => write!(f, "'{}'", c),
        }
    }
}

/// Tracks which modifier keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub control: bool,
    pub alt: bool,
    pub super_: bool,
    pub shift: bool,
}

impl ModifierState {
    /// Build the state where exactly the given modifiers are held
    pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
        let mut state = Self::default();
        for &modifier in modifiers {
            state.set(modifier, true);
        }
        state
    }

    /// Mark a modifier as held or released
    pub fn set(&mut self, modifier: Modifier, held: bool) {
        match modifier {
            Modifier::Control => self.control = held,
            Modifier::Alt => self.alt = held,
            Modifier::Super => self.super_ = held,
            Modifier::Shift => self.shift = held,
        }
    }

    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.control && !self.alt && !self.super_ && !self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_aliases() {
        assert_eq!(Modifier::from_name("ctrl"), Some(Modifier::Control));
        assert_eq!(Modifier::from_name("Control"), Some(Modifier::Control));
        assert_eq!(Modifier::from_name("cmd"), Some(Modifier::Super));
        assert_eq!(Modifier::from_name("SHIFT"), Some(Modifier::Shift));
        assert_eq!(Modifier::from_name("tab"), None);
    }

    #[test]
    fn test_special_key_table() {
        assert_eq!(SpecialKey::from_name("tab"), Some(SpecialKey::Tab));
        assert_eq!(SpecialKey::from_name("page_down"), Some(SpecialKey::PageDown));
        assert_eq!(SpecialKey::from_name("F20"), Some(SpecialKey::F20));
        assert_eq!(SpecialKey::from_name("f21"), None);
        assert_eq!(SpecialKey::from_name("a"), None);
    }

    #[test]
    fn test_special_key_names_round_trip() {
        for name in ["tab", "left", "enter", "page_up", "f1", "f13"] {
            let key = SpecialKey::from_name(name).unwrap();
            assert_eq!(key.name(), name);
        }
    }

    #[test]
    fn test_empty_state() {
        let state = ModifierState::default();
        assert!(state.is_empty());
    }

    #[test]
    fn test_state_from_modifiers() {
        let state = ModifierState::from_modifiers(&[Modifier::Control, Modifier::Alt]);
        assert!(state.control);
        assert!(state.alt);
        assert!(!state.super_);
        assert!(!state.shift);

        let mut held = ModifierState::default();
        held.set(Modifier::Alt, true);
        held.set(Modifier::Control, true);
        assert_eq!(held, state);

        held.set(Modifier::Alt, false);
        held.set(Modifier::Control, false);
        assert!(held.is_empty());
    }
}

//! Keystroke injection through `enigo`

use enigo::{Direction, Enigo, Keyboard, Settings};
use tracing::{debug, info};

use super::{InjectionError, InputBackend, KeyAction};
use crate::hotkey::{Key, Modifier, SpecialKey};

/// Process-wide keyboard controller backed by `enigo`
pub struct EnigoBackend {
    enigo: Enigo,
}

impl EnigoBackend {
    /// Connect to the platform keyboard controller
    pub fn new() -> Result<Self, InjectionError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| InjectionError::Connect(e.to_string()))?;
        info!("keyboard controller connected");
        Ok(Self { enigo })
    }

    fn send(&mut self, key: Key, action: KeyAction) -> Result<(), InjectionError> {
        let direction = match action {
            KeyAction::Press => Direction::Press,
            KeyAction::Release => Direction::Release,
        };
        debug!(%key, %action, "injecting key");
        self.enigo
            .key(to_enigo(key), direction)
            .map_err(|e| InjectionError::Rejected {
                action,
                key,
                reason: e.to_string(),
            })
    }
}

impl InputBackend for EnigoBackend {
    fn press(&mut self, key: Key) -> Result<(), InjectionError> {
        self.send(key, KeyAction::Press)
    }

    fn release(&mut self, key: Key) -> Result<(), InjectionError> {
        self.send(key, KeyAction::Release)
    }
}

fn to_enigo(key: Key) -> enigo::Key {
    use enigo::Key as E;

    match key {
        Key::Modifier(Modifier::Control) => E::Control,
        Key::Modifier(Modifier::Alt) => E::Alt,
        Key::Modifier(Modifier::Super) => E::Meta,
        Key::Modifier(Modifier::Shift) => E::Shift,
        Key::Special(special) => match special {
            SpecialKey::Tab => E::Tab,
            SpecialKey::Left => E::LeftArrow,
            SpecialKey::Up => E::UpArrow,
            SpecialKey::Right => E::RightArrow,
            SpecialKey::Down => E::DownArrow,
            SpecialKey::Enter => E::Return,
            SpecialKey::PageUp => E::PageUp,
            SpecialKey::PageDown => E::PageDown,
            SpecialKey::F1 => E::F1,
            SpecialKey::F2 => E::F2,
            SpecialKey::F3 => E::F3,
            SpecialKey::F4 => E::F4,
            SpecialKey::F5 => E::F5,
            SpecialKey::F6 => E::F6,
            SpecialKey::F7 => E::F7,
            SpecialKey::F8 => E::F8,
            SpecialKey::F9 => E::F9,
            SpecialKey::F10 => E::F10,
            SpecialKey::F11 => E::F11,
            SpecialKey::F12 => E::F12,
            SpecialKey::F13 => E::F13,
            SpecialKey::F14 => E::F14,
            SpecialKey::F15 => E::F15,
            SpecialKey::F16 => E::F16,
            SpecialKey::F17 => E::F17,
            SpecialKey::F18 => E::F18,
            SpecialKey::F19 => E::F19,
            SpecialKey::F20 => E::F20,
        },
        Key::Char(c) => E::Unicode(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(to_enigo(Key::Modifier(Modifier::Super)), enigo::Key::Meta);
        assert_eq!(to_enigo(Key::Special(SpecialKey::Enter)), enigo::Key::Return);
        assert_eq!(to_enigo(Key::Special(SpecialKey::PageDown)), enigo::Key::PageDown);
        assert_eq!(to_enigo(Key::Char('a')), enigo::Key::Unicode('a'));
    }
}

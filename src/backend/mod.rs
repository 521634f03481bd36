//! Input backends for keystroke injection
//!
//! [`InputBackend`] is the seam between playback and the OS keyboard
//! controller. The real implementation is [`EnigoBackend`].

mod controller;

use std::fmt;

use crate::hotkey::{Key, Modifier};

pub use controller::EnigoBackend;

/// Direction of a single key operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Press => write!(f, "press"),
            KeyAction::Release => write!(f, "release"),
        }
    }
}

/// Errors raised by an input backend
#[derive(Debug, thiserror::Error)]
pub enum InjectionError {
    #[error("failed to connect to the keyboard controller: {0}")]
    Connect(String),

    #[error("failed to {action} {key}: {reason}")]
    Rejected {
        action: KeyAction,
        key: Key,
        reason: String,
    },
}

/// A keyboard controller that can press and release keys
pub trait InputBackend {
    fn press(&mut self, key: Key) -> Result<(), InjectionError>;

    fn release(&mut self, key: Key) -> Result<(), InjectionError>;

    /// Press and release `key`
    fn tap(&mut self, key: Key) -> Result<(), InjectionError> {
        self.press(key)?;
        self.release(key)
    }

    /// Hold `modifiers` (pressed in order) for the duration of `f`.
    ///
    /// Every modifier that was successfully pressed is released in reverse
    /// order on all exit paths. The first error wins.
    fn hold<T, F>(&mut self, modifiers: &[Modifier], f: F) -> Result<T, InjectionError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, InjectionError>,
    {
        let mut held = 0;
        let mut press_error = None;
        for &modifier in modifiers {
            match self.press(Key::Modifier(modifier)) {
                Ok(()) => held += 1,
                Err(e) => {
                    press_error = Some(e);
                    break;
                }
            }
        }

        let result = match press_error {
            Some(e) => Err(e),
            None => f(self),
        };

        let mut release_error = None;
        for &modifier in modifiers[..held].iter().rev() {
            if let Err(e) = self.release(Key::Modifier(modifier)) {
                release_error.get_or_insert(e);
            }
        }

        match (result, release_error) {
            (Err(e), _) | (Ok(_), Some(e)) => Err(e),
            (Ok(value), None) => Ok(value),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::recording::{KeyEvent::*, RecordingBackend};
    use super::*;

    const CTRL: Key = Key::Modifier(Modifier::Control);
    const ALT: Key = Key::Modifier(Modifier::Alt);

    #[test]
    fn test_hold_releases_in_reverse() {
        let mut backend = RecordingBackend::new();
        backend
            .hold(&[Modifier::Control, Modifier::Alt], |b| b.tap(Key::Char('x')))
            .unwrap();

        assert_eq!(
            backend.events,
            vec![
                Press(CTRL),
                Press(ALT),
                Press(Key::Char('x')),
                Release(Key::Char('x')),
                Release(ALT),
                Release(CTRL),
            ]
        );
    }

    #[test]
    fn test_hold_releases_when_block_fails() {
        // op 2 is the operand press
        let mut backend = RecordingBackend::failing_at(2);
        let result = backend.hold(&[Modifier::Control, Modifier::Alt], |b| b.tap(Key::Char('x')));

        assert!(matches!(
            result,
            Err(InjectionError::Rejected {
                action: KeyAction::Press,
                key: Key::Char('x'),
                ..
            })
        ));
        assert_eq!(
            backend.events,
            vec![Press(CTRL), Press(ALT), Release(ALT), Release(CTRL)]
        );
    }

    #[test]
    fn test_hold_releases_only_pressed_modifiers() {
        // op 1 is the second modifier press
        let mut backend = RecordingBackend::failing_at(1);
        let mut ran = false;
        let result = backend.hold(&[Modifier::Control, Modifier::Alt], |_| {
            ran = true;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!ran);
        assert_eq!(backend.events, vec![Press(CTRL), Release(CTRL)]);
    }

    #[test]
    fn test_hold_reports_release_failure() {
        // ops: press ctrl, press x, release x, release ctrl
        let mut backend = RecordingBackend::failing_at(3);
        let result = backend.hold(&[Modifier::Control], |b| b.tap(Key::Char('x')));

        assert!(matches!(
            result,
            Err(InjectionError::Rejected {
                action: KeyAction::Release,
                key: CTRL,
                ..
            })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = InjectionError::Rejected {
            action: KeyAction::Press,
            key: Key::Char('q'),
            reason: "no display".to_string(),
        };
        assert_eq!(err.to_string(), "failed to press 'q': no display");
    }
}

//! Keystroke directives: one entry of the configured playback sequence

use std::fmt;
use std::time::Duration;

use crate::hotkey::{self, MalformedHotkey, StructuredHotkey};

/// One step of a playback sequence
#[derive(Debug, Clone, PartialEq)]
pub enum KeystrokeDirective {
    /// Type a hotkey; keeps the separator it was parsed with
    Hotkey {
        hotkey: StructuredHotkey,
        separator: String,
    },
    /// Pause playback
    Delay(Duration),
}

/// Errors from parsing a directive entry
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    #[error(transparent)]
    Hotkey(#[from] MalformedHotkey),

    #[error("malformed delay '{entry}': expected 'delay <seconds>'")]
    DelaySyntax { entry: String },

    #[error("invalid delay '{entry}': seconds must be a finite non-negative number")]
    DelayValue { entry: String },
}

impl KeystrokeDirective {
    /// Parse one entry: `delay <seconds>` or a hotkey specifier
    pub fn parse(entry: &str, separator: &str) -> Result<Self, DirectiveError> {
        let mut words = entry.split_whitespace();
        if words.next() == Some("delay") {
            let seconds = match (words.next(), words.next()) {
                (Some(seconds), None) => seconds,
                _ => {
                    return Err(DirectiveError::DelaySyntax {
                        entry: entry.to_string(),
                    })
                }
            };
            let seconds: f64 = seconds.parse().map_err(|_| DirectiveError::DelaySyntax {
                entry: entry.to_string(),
            })?;
            let delay = Duration::try_from_secs_f64(seconds).map_err(|_| DirectiveError::DelayValue {
                entry: entry.to_string(),
            })?;
            return Ok(Self::Delay(delay));
        }

        let hotkey = hotkey::parse(entry, separator)?;
        Ok(Self::Hotkey {
            hotkey,
            separator: separator.to_string(),
        })
    }
}

impl fmt::Display for KeystrokeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hotkey { hotkey, separator } => f.write_str(&hotkey.to_specifier(separator)),
            Self::Delay(delay) => write!(f, "delay {}", delay.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::{MalformedReason, Modifier, Operand, SpecialKey};

    #[test]
    fn test_delay_directive() {
        let directive = KeystrokeDirective::parse("delay 0.5", "+").unwrap();
        assert_eq!(directive, KeystrokeDirective::Delay(Duration::from_millis(500)));

        let directive = KeystrokeDirective::parse("  delay   2 ", "+").unwrap();
        assert_eq!(directive, KeystrokeDirective::Delay(Duration::from_secs(2)));

        let directive = KeystrokeDirective::parse("delay 0", "+").unwrap();
        assert_eq!(directive, KeystrokeDirective::Delay(Duration::ZERO));
    }

    #[test]
    fn test_bad_delays() {
        for entry in ["delay", "delay abc", "delay 1 2"] {
            assert!(
                matches!(
                    KeystrokeDirective::parse(entry, "+"),
                    Err(DirectiveError::DelaySyntax { .. })
                ),
                "{entry}"
            );
        }
        for entry in ["delay -1", "delay NaN", "delay inf"] {
            assert!(
                matches!(
                    KeystrokeDirective::parse(entry, "+"),
                    Err(DirectiveError::DelayValue { .. })
                ),
                "{entry}"
            );
        }
    }

    #[test]
    fn test_hotkey_directive() {
        let directive = KeystrokeDirective::parse("ctrl+alt+tab", "+").unwrap();
        let KeystrokeDirective::Hotkey { hotkey, separator } = directive else {
            panic!("expected a hotkey directive");
        };
        assert_eq!(hotkey.modifiers(), &[Modifier::Control, Modifier::Alt]);
        assert_eq!(hotkey.operand(), Operand::Special(SpecialKey::Tab));
        assert_eq!(separator, "+");
    }

    #[test]
    fn test_hotkey_errors_pass_through() {
        let err = KeystrokeDirective::parse("ctrl+ctrl+a", "+").unwrap_err();
        let DirectiveError::Hotkey(err) = err else {
            panic!("expected a hotkey error");
        };
        assert_eq!(err.reason, MalformedReason::DuplicateModifier(Modifier::Control));
    }

    #[test]
    fn test_display() {
        let directive = KeystrokeDirective::parse("delay 1.5", "+").unwrap();
        assert_eq!(directive.to_string(), "delay 1.5");

        // hotkeys are shown with the separator they were written with
        let directive = KeystrokeDirective::parse("Cmd-D", "-").unwrap();
        assert_eq!(directive.to_string(), "super-D");

        let directive = KeystrokeDirective::parse("ctrl+alt+tab", "+").unwrap();
        assert_eq!(directive.to_string(), "ctrl+alt+tab");
    }
}

//! Hotkey specifier parsing
//!
//! Turns a human-readable specifier such as `ctrl+alt+tab` into a
//! [`StructuredHotkey`]. Every token but the last is a modifier; the last
//! token is the operand key.

use std::fmt;

use super::keys::{Key, Modifier, SpecialKey};

/// The non-modifier key of a hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A key from the special-key table
    Special(SpecialKey),
    /// A literal printable character
    Char(char),
}

impl Operand {
    pub fn key(self) -> Key {
        match self {
            Operand::Special(k) => Key::Special(k),
            Operand::Char(c) => Key::Char(c),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Special(k) => write!(f, "{}", k),
            Operand::Char(c) => write!(f, "{}", c),
        }
    }
}

/// A parsed hotkey: ordered, duplicate-free modifiers plus one operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuredHotkey {
    modifiers: Vec<Modifier>,
    operand: Operand,
}

impl StructuredHotkey {
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn operand(&self) -> Operand {
        self.operand
    }

    /// Whether the operand came from the special-key table
    pub fn operand_is_special(&self) -> bool {
        matches!(self.operand, Operand::Special(_))
    }

    /// Render as a specifier joined by `separator`; parsing it back with the
    /// same separator yields an equal hotkey
    pub fn to_specifier(&self, separator: &str) -> String {
        let mut tokens: Vec<String> = self.modifiers.iter().map(|m| m.to_string()).collect();
        tokens.push(self.operand.to_string());
        tokens.join(separator)
    }
}

impl fmt::Display for StructuredHotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_specifier("+"))
    }
}

/// Error returned when a hotkey specifier cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed hotkey '{specifier}': {reason}")]
pub struct MalformedHotkey {
    pub specifier: String,
    pub reason: MalformedReason,
}

/// Why a specifier was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("empty key token")]
    EmptyToken,

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("modifier '{0}' appears more than once")]
    DuplicateModifier(Modifier),

    #[error("operand '{0}' is a modifier")]
    OperandIsModifier(String),

    #[error("unknown key '{0}' (expected a special key name or a single character)")]
    UnknownKey(String),
}

/// Parse `specifier` into a [`StructuredHotkey`], splitting tokens on
/// `separator`.
pub fn parse(specifier: &str, separator: &str) -> Result<StructuredHotkey, MalformedHotkey> {
    let malformed = |reason| MalformedHotkey {
        specifier: specifier.to_string(),
        reason,
    };

    if separator.is_empty() {
        return Err(malformed(MalformedReason::EmptySeparator));
    }

    let tokens: Vec<&str> = specifier.split(separator).collect();
    // split always yields at least one token
    let (operand_token, modifier_tokens) = tokens
        .split_last()
        .ok_or_else(|| malformed(MalformedReason::EmptyToken))?;

    let mut modifiers = Vec::with_capacity(modifier_tokens.len());
    for token in modifier_tokens {
        if token.is_empty() {
            return Err(malformed(MalformedReason::EmptyToken));
        }
        let modifier = Modifier::from_name(token)
            .ok_or_else(|| malformed(MalformedReason::UnknownModifier(token.to_string())))?;
        if modifiers.contains(&modifier) {
            return Err(malformed(MalformedReason::DuplicateModifier(modifier)));
        }
        modifiers.push(modifier);
    }

    let operand = parse_operand(operand_token).map_err(malformed)?;

    Ok(StructuredHotkey { modifiers, operand })
}

fn parse_operand(token: &str) -> Result<Operand, MalformedReason> {
    if token.is_empty() {
        return Err(MalformedReason::EmptyToken);
    }
    if Modifier::from_name(token).is_some() {
        return Err(MalformedReason::OperandIsModifier(token.to_string()));
    }
    if let Some(key) = SpecialKey::from_name(token) {
        return Ok(Operand::Special(key));
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Ok(Operand::Char(c)),
        _ => Err(MalformedReason::UnknownKey(token.to_string())),
    }
}

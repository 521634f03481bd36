//! Configuration loading and validation
//!
//! The keystroke file is YAML. Everything is parsed and validated up front
//! so that a broken specifier stops the process before it starts serving.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::hotkey::{self, MalformedHotkey, StructuredHotkey};
use crate::playback::{DirectiveError, KeystrokeDirective, StickyKeys};

/// Default location of the keystroke file
pub const DEFAULT_PATH: &str = "keystrokes_default.yaml";

const DEFAULT_TRIGGER: &str = "ctrl+alt+k";
const DEFAULT_PRE_DELAY_SECS: f64 = 1.0;
const DEFAULT_SEPARATOR: &str = "+";

/// Errors from loading the keystroke file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keystroke file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("keystroke sequence is empty")]
    EmptySequence,

    #[error("hotkey separator must not be empty")]
    EmptySeparator,

    #[error("pre_delay must be a finite non-negative number of seconds, got {0}")]
    InvalidPreDelay(f64),

    #[error("invalid trigger hotkey: {0}")]
    InvalidTrigger(#[source] MalformedHotkey),

    #[error("invalid entry #{index}: {source}")]
    InvalidDirective {
        index: usize,
        #[source]
        source: DirectiveError,
    },
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hotkey the listener watches for
    pub trigger: StructuredHotkey,

    /// Remediation policy, already resolved for this platform
    pub sticky_keys: StickyKeys,

    /// Pause before every playback
    pub pre_delay: Duration,

    /// The playback sequence
    pub directives: Vec<KeystrokeDirective>,
}

/// On-disk layout: a settings mapping
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    #[serde(default = "default_trigger")]
    trigger: String,
    #[serde(default)]
    sticky_keys: bool,
    #[serde(default = "default_pre_delay")]
    pre_delay: f64,
    #[serde(default = "default_separator")]
    separator: String,
    keys: Vec<String>,
}

/// Legacy layout: a bare list of `keys` entries; only the first one is played
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeysEntry {
    keys: Vec<String>,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_string()
}

fn default_pre_delay() -> f64 {
    DEFAULT_PRE_DELAY_SECS
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Config {
    /// Load and validate the keystroke file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// Parse and validate a keystroke document
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        // Pick the layout from the document's shape, then deserialize the
        // source again so errors keep their field names and positions.
        let layout: serde_yaml::Value = serde_yaml::from_str(source)?;
        let settings = if layout.is_sequence() {
            Self::from_legacy(serde_yaml::from_str(source)?)
        } else {
            serde_yaml::from_str::<Settings>(source)?
        };
        Self::validate(settings)
    }

    fn from_legacy(entries: Vec<KeysEntry>) -> Settings {
        if entries.len() > 1 {
            warn!(
                ignored = entries.len() - 1,
                "only the first keystroke entry is played"
            );
        }
        let keys = entries
            .into_iter()
            .next()
            .map(|entry| entry.keys)
            .unwrap_or_default();
        Settings {
            trigger: default_trigger(),
            sticky_keys: false,
            pre_delay: default_pre_delay(),
            separator: default_separator(),
            keys,
        }
    }

    fn validate(settings: Settings) -> Result<Self, ConfigError> {
        if settings.separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        if settings.keys.is_empty() {
            return Err(ConfigError::EmptySequence);
        }

        let pre_delay = Duration::try_from_secs_f64(settings.pre_delay)
            .map_err(|_| ConfigError::InvalidPreDelay(settings.pre_delay))?;

        let trigger = hotkey::parse(&settings.trigger, &settings.separator)
            .map_err(ConfigError::InvalidTrigger)?;

        let directives = settings
            .keys
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                KeystrokeDirective::parse(entry, &settings.separator)
                    .map_err(|source| ConfigError::InvalidDirective { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trigger,
            sticky_keys: StickyKeys::for_platform(settings.sticky_keys),
            pre_delay,
            directives,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::hotkey::{MalformedReason, Modifier, Operand};

    #[test]
    fn test_full_document() {
        let config = Config::from_yaml(
            r#"
trigger: ctrl+shift+h
sticky_keys: false
pre_delay: 0.25
keys:
  - super+tab
  - delay 1.0
  - ctrl+a
"#,
        )
        .unwrap();

        assert_eq!(config.trigger.modifiers(), &[Modifier::Control, Modifier::Shift]);
        assert_eq!(config.trigger.operand(), Operand::Char('h'));
        assert!(!config.sticky_keys.is_enabled());
        assert_eq!(config.pre_delay, Duration::from_millis(250));
        assert_eq!(config.directives.len(), 3);
        assert_eq!(
            config.directives[1],
            KeystrokeDirective::Delay(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("keys: [ctrl+c]").unwrap();
        assert_eq!(config.trigger.to_string(), DEFAULT_TRIGGER);
        assert_eq!(config.pre_delay, Duration::from_secs(1));
        assert!(!config.sticky_keys.is_enabled());
    }

    #[test]
    fn test_sticky_keys_follow_platform() {
        let config = Config::from_yaml("sticky_keys: true\nkeys: [ctrl+c]").unwrap();
        assert_eq!(config.sticky_keys.is_enabled(), cfg!(target_os = "linux"));
    }

    #[test]
    fn test_legacy_list_layout() {
        let config = Config::from_yaml(
            r#"
- keys:
    - super+tab
    - delay 0.5
- keys:
    - ctrl+z
"#,
        )
        .unwrap();

        assert_eq!(config.directives.len(), 2);
        assert_eq!(config.pre_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_custom_separator() {
        let config = Config::from_yaml("separator: '-'\ntrigger: ctrl-f9\nkeys: [alt-left]").unwrap();
        assert_eq!(config.trigger.to_string(), "ctrl+f9");
        match &config.directives[0] {
            KeystrokeDirective::Hotkey { hotkey, separator } => {
                assert_eq!(hotkey.to_string(), "alt+left");
                assert_eq!(separator, "-");
            }
            other => panic!("unexpected directive: {other}"),
        }
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert!(matches!(
            Config::from_yaml("keys: []"),
            Err(ConfigError::EmptySequence)
        ));
        assert!(matches!(
            Config::from_yaml("[]"),
            Err(ConfigError::EmptySequence)
        ));
    }

    #[test]
    fn test_bad_directive_is_rejected_with_index() {
        let err = Config::from_yaml("keys: [ctrl+a, ctrl+ctrl+a]").unwrap_err();
        match err {
            ConfigError::InvalidDirective {
                index,
                source: DirectiveError::Hotkey(malformed),
            } => {
                assert_eq!(index, 1);
                assert_eq!(
                    malformed.reason,
                    MalformedReason::DuplicateModifier(Modifier::Control)
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_settings_are_rejected() {
        assert!(matches!(
            Config::from_yaml("trigger: ctrl+ctrl\nkeys: [a]"),
            Err(ConfigError::InvalidTrigger(_))
        ));
        assert!(matches!(
            Config::from_yaml("pre_delay: -1\nkeys: [a]"),
            Err(ConfigError::InvalidPreDelay(_))
        ));
        assert!(matches!(
            Config::from_yaml("separator: ''\nkeys: [a]"),
            Err(ConfigError::EmptySeparator)
        ));
        assert!(matches!(
            Config::from_yaml("just a string"),
            Err(ConfigError::Parse(_))
        ));
    }

    fn parse_error(source: &str) -> String {
        match Config::from_yaml(source) {
            Err(err @ ConfigError::Parse(_)) => err.to_string(),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors_name_the_cause() {
        let message = parse_error("sticky_key: true\nkeys: [ctrl+a]");
        assert!(message.contains("unknown field"), "{message}");
        assert!(message.contains("sticky_key"), "{message}");

        let message = parse_error("keys: [a]\nunknown: 1");
        assert!(message.contains("unknown"), "{message}");

        for source in [
            "keys: ctrl+a",
            "pre_delay: abc\nkeys: [a]",
            "sticky_keys: yes\nkeys: [a]",
        ] {
            let message = parse_error(source);
            assert!(message.contains("invalid type"), "{source}: {message}");
            assert!(!message.contains("untagged"), "{source}: {message}");
        }
    }

    #[test]
    fn test_legacy_errors_name_the_cause() {
        let message = parse_error("- key: [ctrl+a]");
        assert!(message.contains("unknown field"), "{message}");
        assert!(message.contains("key"), "{message}");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pre_delay: 0\nkeys:\n  - ctrl+alt+tab\n  - delay 1.0").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.pre_delay, Duration::ZERO);
        assert_eq!(config.directives.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/keystrokes.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/keystrokes.yaml"));
    }
}

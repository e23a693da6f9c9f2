// Xautocfg Config Model
// Keyboard repeat settings and hook commands read from the config file

pub mod entries;
pub mod parser;

use std::fs;
use std::path::PathBuf;

use crate::paths::{self, ConfigLocation};

pub use entries::{lookup_entry, Section, ValueError};
pub use parser::{classify_line, parse_config, Line};

/// Default delay before a held key starts repeating, in milliseconds
pub const DEFAULT_REPEAT_DELAY_MS: u32 = 200;

/// Default time between repeats, in milliseconds (50 Hz)
pub const DEFAULT_REPEAT_INTERVAL_MS: u32 = 20;

/// Settings applied whenever a keyboard becomes active.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time before a held key starts auto-repeating
    pub repeat_delay_ms: u32,
    /// Time between repeats once auto-repeat kicked in
    pub repeat_interval_ms: u32,
    /// Shell command run when a keyboard is enabled
    pub on_enable_command: Option<String>,
    /// Shell command run when a keyboard is disabled
    pub on_disable_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
            on_enable_command: None,
            on_disable_command: None,
        }
    }
}

/// Errors that can occur while loading the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to open config file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid syntax in line {line}:\n{text}")]
    Syntax { line: usize, text: String },

    #[error("unknown section name in line {line}:\n{text}")]
    UnknownSection { line: usize, text: String },

    #[error("unknown key '{key}' in section [{section}], line {line}:\n{text}")]
    UnknownKey {
        line: usize,
        section: Section,
        key: String,
        text: String,
    },

    #[error("not in a config section, line {line}:\n{text}")]
    NoSection { line: usize, text: String },

    #[error("invalid value for '{key}' in line {line} ({source}):\n{text}")]
    InvalidValue {
        line: usize,
        key: String,
        text: String,
        source: ValueError,
    },
}

impl ConfigError {
    /// Physical line of the config file the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::Open { .. } | ConfigError::Read { .. } => None,
            ConfigError::Syntax { line, .. }
            | ConfigError::UnknownSection { line, .. }
            | ConfigError::UnknownKey { line, .. }
            | ConfigError::NoSection { line, .. }
            | ConfigError::InvalidValue { line, .. } => Some(*line),
        }
    }
}

impl Config {
    /// Load the config from `location`.
    ///
    /// A missing or unreadable file is fatal only when the path was given
    /// explicitly. For the default location the built-in settings are used.
    pub fn load(location: &ConfigLocation) -> Result<Self, ConfigError> {
        let path = location.path();
        let content = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(source) if !location.is_explicit() => {
                log::warn!(
                    "failed to open config file '{}': {}",
                    path.display(),
                    source
                );
                log::warn!("using default config.");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let content = String::from_utf8(content).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let home = paths::home_dir().ok();
        parse_config(&content, home.as_deref())
    }

    /// Hook command for a transition direction
    pub fn hook_for(&self, became_enabled: bool) -> Option<&str> {
        let command = if became_enabled {
            self.on_enable_command.as_deref()
        } else {
            self.on_disable_command.as_deref()
        };
        command.filter(|c| !c.trim().is_empty())
    }
}

/// Repeat interval in milliseconds for a repeat rate in Hz.
///
/// The X server wants the interval between repeats while `xset r rate`
/// style settings give a rate, so interval = 1000 ms / rate.
pub fn interval_from_rate(rate_hz: u32) -> Option<u32> {
    if rate_hz == 0 {
        return None;
    }
    Some((1000.0_f64 / f64::from(rate_hz)).round() as u32)
}

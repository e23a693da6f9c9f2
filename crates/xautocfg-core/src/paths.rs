// Xautocfg Paths
// Home directory lookup, default config location and `~` expansion

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the config below `$HOME/.config`
pub const CONFIG_FILE_NAME: &str = "xautocfg.cfg";

/// Errors that can occur while resolving user paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("HOME env not set, can't locate {0}")]
    HomeNotSet(&'static str),
}

/// Where the config file came from.
///
/// The origin decides what happens when the file cannot be opened: an
/// explicit path is fatal, the default path falls back to built-in settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Given on the command line with `-c/--config`
    Explicit(PathBuf),
    /// Derived from `$HOME`
    Default(PathBuf),
}

impl ConfigLocation {
    /// Resolve the location from an optional command line argument
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, PathError> {
        Self::resolve_in(explicit, home_dir().ok().as_deref())
    }

    /// Like `resolve`, with the home directory given by the caller.
    ///
    /// `$HOME` is only needed when no explicit path was passed.
    pub fn resolve_in(explicit: Option<PathBuf>, home: Option<&Path>) -> Result<Self, PathError> {
        match explicit {
            Some(path) => Ok(Self::Explicit(path)),
            None => home
                .map(|home| Self::Default(config_path_in(home)))
                .ok_or(PathError::HomeNotSet("config")),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Default(path) => path,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}

/// The user's home directory, taken from `$HOME`.
///
/// There is no passwd fallback: an unset or empty `HOME` is an error.
pub fn home_dir() -> Result<PathBuf, PathError> {
    home_from(std::env::var_os("HOME")).ok_or(PathError::HomeNotSet("home directory"))
}

fn home_from(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// `$HOME/.config/xautocfg.cfg`
fn config_path_in(home: &Path) -> PathBuf {
    home.join(".config").join(CONFIG_FILE_NAME)
}

/// Expand a leading `~` in a hook command against `home`.
///
/// Only `~` on its own or followed by `/` is expanded; `~user` forms and
/// tildes later in the command are left alone. Returns `None` when the
/// command needs a home directory but none is known.
pub fn expand_tilde(command: &str, home: Option<&Path>) -> Option<String> {
    let rest = match command.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return Some(command.to_string()),
    };

    let home = home?;
    Some(format!("{}{}", home.display(), rest))
}

//! Optional TOML settings file (`~/.sym.toml`).
//!
//! Every key is optional.  Command-line values take precedence over the file,
//! which takes precedence over the built-in defaults.
//!
//! ```toml
//! dir = "~/dotfiles"
//! target = "/home/u"
//! verbose = true
//! simulate = false
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// File name looked up in the home directory when no `--config` is given.
pub const DEFAULT_FILE_NAME: &str = ".sym.toml";

/// Values read from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Source root holding the packages.
    pub dir: Option<PathBuf>,
    /// Target root the packages are mirrored into.
    pub target: Option<PathBuf>,
    /// Report every per-entry decision.
    pub verbose: Option<bool>,
    /// Compute decisions without touching the filesystem.
    pub simulate: Option<bool>,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSyntax`] if the text is not valid TOML
    /// or contains unknown keys.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidSyntax {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields the defaults unless `required` is set, in which
    /// case it is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content, path)
    }

    /// Expand a leading `~` in the path settings against `home`.
    #[must_use]
    pub fn expand_home(mut self, home: Option<&Path>) -> Self {
        if let Some(home) = home {
            self.dir = self.dir.map(|p| expand_tilde(&p, home));
            self.target = self.target.map(|p| expand_tilde(&p, home));
        }
        self
    }
}

/// Default settings file location: `$HOME/.sym.toml`.
#[must_use]
pub fn default_path(home: Option<&Path>) -> Option<PathBuf> {
    home.map(|h| h.join(DEFAULT_FILE_NAME))
}

/// The user's home directory from `HOME` (or `USERPROFILE` on Windows).
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn expand_tilde(path: &Path, home: &Path) -> PathBuf {
    path.strip_prefix("~")
        .map_or_else(|_| path.to_path_buf(), |rest| home.join(rest))
}

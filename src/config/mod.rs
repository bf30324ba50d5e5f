//! Resolved run configuration.
//!
//! [`Config`] is built once per invocation, validated on construction and
//! read-only afterwards.  The optional settings file is handled by
//! [`settings`].
pub mod settings;

use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Mode flags supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Flags {
    /// Report every per-entry decision.
    pub verbose: bool,
    /// Compute and report decisions without touching the filesystem.
    pub simulate: bool,
    /// Remove links instead of creating them.
    pub delete: bool,
    /// Remove links, then create them again.
    pub relink: bool,
}

/// What to do with each package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create links (the default).
    Link,
    /// Remove links.
    Unlink,
    /// Remove links, then create them again.
    Relink,
}

/// Immutable configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    source_root: PathBuf,
    target_root: PathBuf,
    flags: Flags,
    packages: Vec<String>,
}

impl Config {
    /// Build a configuration from already-resolved roots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RelativeRoot`] if either root is relative, and
    /// [`ConfigError::NoPackages`] if `packages` is empty.
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        flags: Flags,
        packages: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let source_root = source_root.into();
        let target_root = target_root.into();
        for (role, path) in [("source", &source_root), ("target", &target_root)] {
            if !path.is_absolute() {
                return Err(ConfigError::RelativeRoot {
                    role,
                    path: path.clone(),
                });
            }
        }
        if packages.is_empty() {
            return Err(ConfigError::NoPackages);
        }
        Ok(Self {
            source_root,
            target_root,
            flags,
            packages,
        })
    }

    /// Directory holding the packages.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Directory the packages are mirrored into.
    #[must_use]
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Package names, in processing order.
    #[must_use]
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// The mode flags.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Whether per-entry decisions are reported.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.flags.verbose
    }

    /// Whether filesystem mutations are suppressed.
    #[must_use]
    pub const fn simulate(&self) -> bool {
        self.flags.simulate
    }

    /// Operation to perform.  Relink takes precedence over delete.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.flags.relink {
            Mode::Relink
        } else if self.flags.delete {
            Mode::Unlink
        } else {
            Mode::Link
        }
    }
}

/// Make `path` absolute against `cwd` and remove `.` and `..` components
/// lexically, without touching the filesystem.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let mut result = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if result.parent().is_some() {
                    result.pop();
                }
            }
            _ => result.push(component),
        }
    }
    dunce::simplified(&result).to_path_buf()
}

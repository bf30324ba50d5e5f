//! Domain-specific error types for the symlink farm.
//!
//! The linker returns [`SymError`]; configuration resolution returns
//! [`ConfigError`].  Command handlers at the CLI boundary convert both to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! SymError
//! ├── InvalidPackage / PackageNotFound           package cannot be resolved
//! ├── LinkConflict / NotASymlink / NotADirectory target is occupied
//! ├── Io                                         filesystem call failed
//! ├── Entry(SymError)                            failure at a path in a walk
//! └── RelinkUnlink(SymError)                     unlink phase of a relink failed
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`SymError`], looking through wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The package name is not usable as a path below the source root.
    InvalidInput,
    /// The package directory does not exist.
    NotFound,
    /// A target path is occupied by something this tool did not create.
    Conflict,
    /// A filesystem call failed.
    Io,
}

/// Errors raised while linking or unlinking a package.
#[derive(Error, Debug)]
pub enum SymError {
    /// The package name is empty or escapes the source root.
    #[error("invalid package name '{package}'")]
    InvalidPackage {
        /// Name as given by the caller.
        package: String,
    },

    /// The package directory is missing or is not a directory.
    #[error("package directory does not exist: {}", .path.display())]
    PackageNotFound {
        /// Name as given by the caller.
        package: String,
        /// Resolved package directory.
        path: PathBuf,
    },

    /// The target is a symlink that points somewhere else.
    #[error(
        "target {} already exists and points to {} (not {})",
        .target.display(),
        .actual.display(),
        .expected.display()
    )]
    LinkConflict {
        /// Path in the target tree.
        target: PathBuf,
        /// Source path the link should point to.
        expected: PathBuf,
        /// Destination currently stored in the link.
        actual: PathBuf,
    },

    /// The target exists and is not a symlink.
    #[error("target {} already exists and is not a symlink", .target.display())]
    NotASymlink {
        /// Path in the target tree.
        target: PathBuf,
    },

    /// A package directory maps onto a target that is not a directory.
    #[error("target {} already exists and is not a directory", .target.display())]
    NotADirectory {
        /// Path in the target tree.
        target: PathBuf,
    },

    /// A filesystem call failed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        /// Short verb phrase naming the attempted call.
        action: &'static str,
        /// Path the call was made on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A failure while handling one entry of a package walk.
    #[error("{}: {source}", .relative.display())]
    Entry {
        /// Entry path relative to the package root.
        relative: PathBuf,
        /// The failure itself.
        source: Box<SymError>,
    },

    /// The unlink phase of a relink failed; linking was not attempted.
    #[error("failed to unlink during relink: {source}")]
    RelinkUnlink {
        /// The unlink failure.
        source: Box<SymError>,
    },
}

impl SymError {
    /// Build a closure that wraps an [`io::Error`] for `path`.
    ///
    /// Intended for `map_err` on filesystem calls.
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }

    /// Classify the error, looking through [`Entry`](Self::Entry) and
    /// [`RelinkUnlink`](Self::RelinkUnlink) wrappers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            Self::InvalidPackage { .. } => ErrorKind::InvalidInput,
            Self::PackageNotFound { .. } => ErrorKind::NotFound,
            Self::LinkConflict { .. } | Self::NotASymlink { .. } | Self::NotADirectory { .. } => {
                ErrorKind::Conflict
            }
            Self::Io { .. } | Self::Entry { .. } | Self::RelinkUnlink { .. } => ErrorKind::Io,
        }
    }

    /// Return the innermost error, unwrapping walk and relink context.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Entry { source, .. } | Self::RelinkUnlink { source } = current {
            current = &**source;
        }
        current
    }

    /// Return `true` if the failure happened in the unlink phase of a relink.
    #[must_use]
    pub const fn is_relink_unlink(&self) -> bool {
        matches!(self, Self::RelinkUnlink { .. })
    }
}

/// Errors that arise while building a [`Config`](crate::config::Config).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A root directory was given as a relative path.
    #[error("{role} directory must be an absolute path: {}", .path.display())]
    RelativeRoot {
        /// Which root was rejected (`"source"` or `"target"`).
        role: &'static str,
        /// The offending path.
        path: PathBuf,
    },

    /// No package names were supplied.
    #[error("no packages specified")]
    NoPackages,

    /// The settings file could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid TOML for the expected schema.
    #[error("invalid config file {}: {message}", .path.display())]
    InvalidSyntax {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn conflict() -> SymError {
        SymError::LinkConflict {
            target: PathBuf::from("/home/u/.vimrc"),
            expected: PathBuf::from("/src/vim/.vimrc"),
            actual: PathBuf::from("/other/.vimrc"),
        }
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    #[test]
    fn link_conflict_display_names_both_destinations() {
        assert_eq!(
            conflict().to_string(),
            "target /home/u/.vimrc already exists and points to /other/.vimrc (not /src/vim/.vimrc)"
        );
    }

    #[test]
    fn not_a_symlink_display() {
        let e = SymError::NotASymlink {
            target: PathBuf::from("/home/u/.bashrc"),
        };
        assert_eq!(
            e.to_string(),
            "target /home/u/.bashrc already exists and is not a symlink"
        );
    }

    #[test]
    fn package_not_found_display() {
        let e = SymError::PackageNotFound {
            package: "vim".to_string(),
            path: PathBuf::from("/src/vim"),
        };
        assert_eq!(e.to_string(), "package directory does not exist: /src/vim");
    }

    #[test]
    fn io_display_includes_action_and_path() {
        let e = SymError::io("create symlink", "/home/u/.vimrc")(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let msg = e.to_string();
        assert!(msg.contains("create symlink"));
        assert!(msg.contains("/home/u/.vimrc"));
        assert!(e.source().is_some());
    }

    #[test]
    fn entry_display_prefixes_relative_path() {
        let e = SymError::Entry {
            relative: PathBuf::from(".vimrc"),
            source: Box::new(conflict()),
        };
        assert!(e.to_string().starts_with(".vimrc: target"));
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn kind_looks_through_wrappers() {
        let e = SymError::RelinkUnlink {
            source: Box::new(SymError::Entry {
                relative: PathBuf::from("colors/foo.vim"),
                source: Box::new(conflict()),
            }),
        };
        assert_eq!(e.kind(), ErrorKind::Conflict);
        assert!(e.is_relink_unlink());
        assert!(matches!(e.root_cause(), SymError::LinkConflict { .. }));
    }

    #[test]
    fn kind_of_each_leaf() {
        assert_eq!(
            SymError::InvalidPackage {
                package: "..".to_string()
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            SymError::PackageNotFound {
                package: "x".to_string(),
                path: PathBuf::from("/src/x"),
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SymError::NotADirectory {
                target: PathBuf::from("/t/colors"),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            SymError::io("remove symlink", "/t/a")(io::Error::other("boom")).kind(),
            ErrorKind::Io
        );
    }

    // -----------------------------------------------------------------------
    // ConfigError
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_relative_root_display() {
        let e = ConfigError::RelativeRoot {
            role: "target",
            path: PathBuf::from("home"),
        };
        assert_eq!(
            e.to_string(),
            "target directory must be an absolute path: home"
        );
    }

    #[test]
    fn config_error_io_has_source() {
        let e = ConfigError::Io {
            path: PathBuf::from("/home/u/.sym.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/home/u/.sym.toml"));
    }

    // -----------------------------------------------------------------------
    // Send + Sync bounds / anyhow conversion
    // -----------------------------------------------------------------------

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<SymError>();
        assert_send_sync::<ConfigError>();
    }

    #[test]
    fn sym_error_converts_to_anyhow() {
        let _anyhow_err: anyhow::Error = conflict().into();
    }
}

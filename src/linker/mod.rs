//! Link, unlink and relink a single package.
//!
//! A package is a directory directly below the source root.  Its tree is
//! mirrored into the target root: directories become real directories and
//! every other entry becomes a symlink pointing back at the package.
mod decision;
mod report;

pub use decision::{
    DirAction, LinkAction, TargetState, UnlinkAction, decide_dir, decide_link, decide_unlink,
    probe,
};
pub use report::Report;

use std::path::{Component, Path, PathBuf};

use crate::config::{Config, Mode};
use crate::error::SymError;
use crate::logging::Log;
use crate::operations::{DEFAULT_DIR_MODE, FileSystemOps};
use crate::walk::Walk;

/// Applies the configured [`Mode`] to packages.
///
/// Holds only borrowed state; create one per run and call
/// [`process`](Self::process) once per package.
pub struct Linker<'a> {
    config: &'a Config,
    fs: &'a dyn FileSystemOps,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Linker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linker")
            .field("config", self.config)
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

/// Wrap a per-entry failure with the entry's package-relative path.
fn in_entry(relative: &Path) -> impl FnOnce(SymError) -> SymError + '_ {
    move |source| SymError::Entry {
        relative: relative.to_path_buf(),
        source: Box::new(source),
    }
}

impl<'a> Linker<'a> {
    /// Create a linker over the given configuration, filesystem and log.
    #[must_use]
    pub const fn new(config: &'a Config, fs: &'a dyn FileSystemOps, log: &'a dyn Log) -> Self {
        Self { config, fs, log }
    }

    /// Apply the configured mode to one package.
    ///
    /// Processing stops at the first failing entry; work already done is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the package cannot be resolved, the walk fails,
    /// or any entry conflicts or cannot be changed.  For a relink, a failure
    /// of the unlink phase is wrapped in [`SymError::RelinkUnlink`] and the
    /// link phase is not attempted.
    pub fn process(&self, package: &str) -> Result<Report, SymError> {
        let root = self.resolve_package(package)?;
        match self.config.mode() {
            Mode::Link => self.link_package(package, &root),
            Mode::Unlink => self.unlink_package(package, &root),
            Mode::Relink => {
                self.log.stage(&format!("Relinking package: {package}"));
                let unlinked = self
                    .unlink_package(package, &root)
                    .map_err(|e| SymError::RelinkUnlink {
                        source: Box::new(e),
                    })?;
                let linked = self.link_package(package, &root)?;
                Ok(unlinked.merge(linked))
            }
        }
    }

    /// Resolve a package name to its directory below the source root.
    ///
    /// # Errors
    ///
    /// Returns [`SymError::InvalidPackage`] if the name is empty or is not
    /// a plain relative path, and [`SymError::PackageNotFound`] if the
    /// directory does not exist.
    pub fn resolve_package(&self, package: &str) -> Result<PathBuf, SymError> {
        let name = Path::new(package);
        let plain = name.components().next().is_some()
            && name
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(SymError::InvalidPackage {
                package: package.to_string(),
            });
        }

        let path = self.config.source_root().join(name);
        if !self.fs.is_dir(&path) {
            return Err(SymError::PackageNotFound {
                package: package.to_string(),
                path,
            });
        }
        Ok(path)
    }

    fn link_package(&self, package: &str, root: &Path) -> Result<Report, SymError> {
        self.log.stage(&format!("Linking package: {package}"));
        let mut report = Report::default();
        for entry in Walk::new(self.fs, root) {
            let entry = entry?;
            let target = self.config.target_root().join(&entry.relative);
            let step = if entry.is_dir() {
                self.ensure_dir(&entry.path, &target, &mut report)
            } else {
                self.link_entry(&entry.path, &target, &mut report)
            };
            step.map_err(in_entry(&entry.relative))?;
        }
        Ok(report)
    }

    fn unlink_package(&self, package: &str, root: &Path) -> Result<Report, SymError> {
        self.log.stage(&format!("Unlinking package: {package}"));
        let mut report = Report::default();
        for entry in Walk::new(self.fs, root) {
            let entry = entry?;
            if entry.is_dir() {
                continue;
            }
            let target = self.config.target_root().join(&entry.relative);
            self.unlink_entry(&entry.path, &target, &mut report)
                .map_err(in_entry(&entry.relative))?;
        }
        Ok(report)
    }

    /// Mirror a package directory, copying its permission bits.
    fn ensure_dir(
        &self,
        source: &Path,
        target: &Path,
        report: &mut Report,
    ) -> Result<(), SymError> {
        let state = probe(self.fs, target)?;
        match decide_dir(&state, self.fs.is_dir(target), target)? {
            DirAction::Exists => {
                self.log
                    .debug(&format!("directory exists: {}", target.display()));
            }
            DirAction::Create => {
                if self.config.simulate() {
                    self.log
                        .dry_run(&format!("would create directory {}", target.display()));
                } else {
                    let mode = self
                        .fs
                        .dir_mode(source)
                        .map_err(SymError::io("read permissions of", source))?;
                    self.fs
                        .create_dir_all(target, mode)
                        .map_err(SymError::io("create directory", target))?;
                    self.log
                        .debug(&format!("created directory {}", target.display()));
                }
                report.dirs_created += 1;
            }
        }
        Ok(())
    }

    fn link_entry(&self, source: &Path, target: &Path, report: &mut Report) -> Result<(), SymError> {
        let state = probe(self.fs, target)?;
        match decide_link(&state, source, target)? {
            LinkAction::AlreadyLinked => {
                self.log.debug(&format!(
                    "already linked: {} -> {}",
                    target.display(),
                    source.display()
                ));
                report.already_linked += 1;
            }
            LinkAction::Create => {
                self.ensure_parent(target, report)?;
                if self.config.simulate() {
                    self.log.dry_run(&format!(
                        "would link {} -> {}",
                        target.display(),
                        source.display()
                    ));
                } else {
                    self.fs
                        .symlink(source, target)
                        .map_err(SymError::io("create symlink", target))?;
                    self.log.debug(&format!(
                        "linked {} -> {}",
                        target.display(),
                        source.display()
                    ));
                }
                report.linked += 1;
            }
        }
        Ok(())
    }

    /// Create a missing parent of `target` with [`DEFAULT_DIR_MODE`].
    ///
    /// Only reachable for entries directly below a missing target root;
    /// deeper parents are mirrored by [`ensure_dir`](Self::ensure_dir).
    fn ensure_parent(&self, target: &Path, report: &mut Report) -> Result<(), SymError> {
        let Some(parent) = target.parent() else {
            return Ok(());
        };
        if self.fs.exists(parent) {
            return Ok(());
        }
        if self.config.simulate() {
            self.log
                .debug(&format!("would create parent {}", parent.display()));
            return Ok(());
        }
        self.fs
            .create_dir_all(parent, DEFAULT_DIR_MODE)
            .map_err(SymError::io("create directory", parent))?;
        self.log
            .debug(&format!("created parent {}", parent.display()));
        report.dirs_created += 1;
        Ok(())
    }

    fn unlink_entry(
        &self,
        source: &Path,
        target: &Path,
        report: &mut Report,
    ) -> Result<(), SymError> {
        let state = probe(self.fs, target)?;
        match decide_unlink(&state, source) {
            UnlinkAction::Absent => {
                self.log.debug(&format!("not present: {}", target.display()));
            }
            UnlinkAction::NotSymlink => {
                self.log.debug(&format!(
                    "not a symlink, leaving alone: {}",
                    target.display()
                ));
                report.left_alone += 1;
            }
            UnlinkAction::Foreign(dest) => {
                self.log.debug(&format!(
                    "points to {} (not {}), leaving alone: {}",
                    dest.display(),
                    source.display(),
                    target.display()
                ));
                report.left_alone += 1;
            }
            UnlinkAction::Remove => {
                if self.config.simulate() {
                    self.log
                        .dry_run(&format!("would remove {}", target.display()));
                } else {
                    self.fs
                        .remove(target)
                        .map_err(SymError::io("remove symlink", target))?;
                    self.log.debug(&format!("removed {}", target.display()));
                }
                report.removed += 1;
            }
        }
        Ok(())
    }
}

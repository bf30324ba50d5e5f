// Shared helpers for integration tests.
//
// Provides a temporary source/target pair and a fluent builder so each
// integration test can lay out packages and pre-existing target entries
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sym::commands;
use sym::config::{Config, Flags};
use sym::logging::Logger;
use sym::operations::SystemFileSystemOps;

/// An isolated `src/` + `home/` pair backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct Farm {
    /// Temporary directory holding both roots.
    pub dir: tempfile::TempDir,
}

impl Farm {
    /// Create empty source and target roots.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(dir.path().join("src")).expect("create source root");
        std::fs::create_dir(dir.path().join("home")).expect("create target root");
        Self { dir }
    }

    /// Source root holding the packages.
    pub fn source(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    /// Target root the packages are mirrored into.
    pub fn target(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Configuration over this farm's roots.
    pub fn config(&self, flags: Flags, packages: &[&str]) -> Config {
        let packages = packages.iter().map(ToString::to_string).collect();
        Config::new(self.source(), self.target(), flags, packages).expect("valid config")
    }

    /// Run the command driver against the real filesystem.
    pub fn run(&self, flags: Flags, packages: &[&str]) -> anyhow::Result<()> {
        self.run_logged(flags, packages).0
    }

    /// Like [`run`](Self::run) but also hands back the logger for inspection.
    pub fn run_logged(&self, flags: Flags, packages: &[&str]) -> (anyhow::Result<()>, Logger) {
        let log = Logger::new();
        let result = commands::run(&self.config(flags, packages), &SystemFileSystemOps, &log);
        (result, log)
    }

    /// Listing of the target tree: one line per entry, directories with a
    /// trailing `/`, symlinks as `path -> destination` with the source root
    /// shown as `$SRC`.
    pub fn target_tree(&self) -> String {
        let mut lines = Vec::new();
        list(&self.target(), &self.target(), &self.source(), &mut lines);
        lines.join("\n")
    }
}

fn list(root: &Path, dir: &Path, source: &Path, lines: &mut Vec<String>) {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").path())
        .collect();
    entries.sort();
    for path in entries {
        let rel = path
            .strip_prefix(root)
            .expect("entry below root")
            .display()
            .to_string();
        let meta = std::fs::symlink_metadata(&path).expect("lstat");
        if meta.file_type().is_symlink() {
            let dest = std::fs::read_link(&path).expect("read link");
            let shown = dest.strip_prefix(source).map_or_else(
                |_| dest.display().to_string(),
                |r| format!("$SRC/{}", r.display()),
            );
            lines.push(format!("{rel} -> {shown}"));
        } else if meta.is_dir() {
            lines.push(format!("{rel}/"));
            list(root, &path, source, lines);
        } else {
            lines.push(rel);
        }
    }
}

/// Fluent builder for [`Farm`].
pub struct FarmBuilder {
    farm: Farm,
}

impl FarmBuilder {
    /// Begin building an empty farm.
    pub fn new() -> Self {
        Self { farm: Farm::new() }
    }

    /// Write a file below the source root, creating parents.
    pub fn with_source_file(self, rel: &str, content: &str) -> Self {
        write(&self.farm.source().join(rel), content);
        self
    }

    /// Create a directory below the source root with explicit permissions.
    #[cfg(unix)]
    pub fn with_source_dir_mode(self, rel: &str, mode: u32) -> Self {
        use std::os::unix::fs::PermissionsExt as _;
        let path = self.farm.source().join(rel);
        std::fs::create_dir_all(&path).expect("create source dir");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
            .expect("set permissions");
        self
    }

    /// Write a regular file below the target root, creating parents.
    pub fn with_target_file(self, rel: &str, content: &str) -> Self {
        write(&self.farm.target().join(rel), content);
        self
    }

    /// Create a symlink below the target root pointing at `dest`.
    #[cfg(unix)]
    pub fn with_target_symlink(self, rel: &str, dest: &Path) -> Self {
        let path = self.farm.target().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create target parent");
        }
        std::os::unix::fs::symlink(dest, &path).expect("create target symlink");
        self
    }

    /// Remove the (initially empty) target root.
    pub fn without_target_root(self) -> Self {
        std::fs::remove_dir(self.farm.target()).expect("remove target root");
        self
    }

    /// The `vim` package: `.vimrc` and `colors/foo.vim`.
    pub fn with_vim_package(self) -> Self {
        self.with_source_file("vim/.vimrc", "set nocompatible\n")
            .with_source_file("vim/colors/foo.vim", "hi Normal\n")
    }

    /// Finish building and return the farm.
    pub fn build(self) -> Farm {
        self.farm
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}

/// Flags for a plain link run.
pub fn link() -> Flags {
    Flags::default()
}

/// Flags for an unlink run.
pub fn unlink() -> Flags {
    Flags {
        delete: true,
        ..Flags::default()
    }
}

/// Flags for a relink run.
pub fn relink() -> Flags {
    Flags {
        relink: true,
        ..Flags::default()
    }
}

/// The same flags with simulate mode switched on.
pub fn simulated(flags: Flags) -> Flags {
    Flags {
        simulate: true,
        ..flags
    }
}

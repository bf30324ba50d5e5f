//! Depth-first, pre-order traversal of a package tree.
//!
//! [`Walk`] is a lazy iterator over [`TreeEntry`] values.  A directory is
//! yielded before its children and siblings are visited in ascending name
//! order.  Entries are probed without following symlinks, so a symlink to a
//! directory is reported as [`EntryKind::Symlink`] and not descended into.
//! The root itself is never yielded.

use std::path::{Path, PathBuf};

use crate::error::SymError;
use crate::operations::{EntryKind, FileSystemOps};

/// A file or directory found below a package root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Path relative to the package root; the key shared with the target tree.
    pub relative: PathBuf,
    /// Kind of the entry itself (symlinks are not followed).
    pub kind: EntryKind,
}

impl TreeEntry {
    /// Returns `true` for real directories.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Lazy depth-first walk over a directory tree.
///
/// Stops after the first error, which is yielded as the final item.
#[derive(Debug)]
pub struct Walk<'a> {
    fs: &'a dyn FileSystemOps,
    root: PathBuf,
    /// Paths still to visit; the next one is at the end.
    pending: Vec<PathBuf>,
    /// Directory whose children are read on the next call.
    expand: Option<PathBuf>,
    done: bool,
}

impl<'a> Walk<'a> {
    /// Start a walk below `root`.  Nothing is read until the first `next()`.
    pub fn new(fs: &'a dyn FileSystemOps, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            fs,
            expand: Some(root.clone()),
            root,
            pending: Vec::new(),
            done: false,
        }
    }

    /// The directory this walk is rooted at.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn push_children(&mut self, dir: &Path) -> Result<(), SymError> {
        let mut children = self
            .fs
            .read_dir(dir)
            .map_err(SymError::io("read directory", dir))?;
        // Reverse order so that popping yields ascending names.
        children.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        self.pending.extend(children);
        Ok(())
    }

    fn visit(&mut self, path: PathBuf) -> Result<TreeEntry, SymError> {
        let kind = self
            .fs
            .entry_kind(&path)
            .map_err(SymError::io("inspect", path.as_path()))?
            .ok_or_else(|| {
                SymError::io("inspect", path.as_path())(std::io::ErrorKind::NotFound.into())
            })?;
        let relative = path
            .strip_prefix(&self.root)
            .map_or_else(|_| path.clone(), Path::to_path_buf);
        if kind == EntryKind::Dir {
            self.expand = Some(path.clone());
        }
        Ok(TreeEntry {
            path,
            relative,
            kind,
        })
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<TreeEntry, SymError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(dir) = self.expand.take()
            && let Err(e) = self.push_children(&dir)
        {
            self.done = true;
            return Some(Err(e));
        }
        let path = self.pending.pop()?;
        let entry = self.visit(path);
        if entry.is_err() {
            self.done = true;
        }
        Some(entry)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::operations::MockFileSystemOps;

    fn relatives(fs: &MockFileSystemOps, root: &str) -> Vec<String> {
        Walk::new(fs, root)
            .map(|e| e.unwrap().relative.display().to_string())
            .collect()
    }

    #[test]
    fn yields_directories_before_children_in_name_order() {
        let fs = MockFileSystemOps::new()
            .with_file("/src/vim/colors/foo.vim")
            .with_file("/src/vim/.vimrc")
            .with_file("/src/vim/colors/bar.vim")
            .with_file("/src/vim/after/plugin/x.vim");
        assert_eq!(
            relatives(&fs, "/src/vim"),
            vec![
                ".vimrc",
                "after",
                "after/plugin",
                "after/plugin/x.vim",
                "colors",
                "colors/bar.vim",
                "colors/foo.vim",
            ]
        );
    }

    #[test]
    fn root_is_not_yielded() {
        let fs = MockFileSystemOps::new().with_dir("/src/empty");
        assert!(relatives(&fs, "/src/empty").is_empty());
    }

    #[test]
    fn symlinked_directory_is_not_descended() {
        let fs = MockFileSystemOps::new()
            .with_file("/elsewhere/inner")
            .with_symlink("/src/pkg/link", "/elsewhere");
        let entries: Vec<TreeEntry> = Walk::new(&fs, "/src/pkg").map(Result::unwrap).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Symlink);
        assert!(!entries[0].is_dir());
    }

    #[test]
    fn entries_carry_absolute_paths() {
        let fs = MockFileSystemOps::new().with_file("/src/vim/colors/foo.vim");
        let entries: Vec<TreeEntry> = Walk::new(&fs, "/src/vim").map(Result::unwrap).collect();
        assert_eq!(entries[1].path, PathBuf::from("/src/vim/colors/foo.vim"));
        assert_eq!(entries[1].relative, PathBuf::from("colors/foo.vim"));
    }

    #[test]
    fn unreadable_root_yields_single_error() {
        let fs = MockFileSystemOps::new();
        let mut walk = Walk::new(&fs, "/missing");
        let err = walk.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("read directory"));
        assert!(walk.next().is_none());
    }

    #[test]
    fn walk_is_lazy() {
        let fs = MockFileSystemOps::new();
        let walk = Walk::new(&fs, "/missing");
        assert_eq!(walk.root(), Path::new("/missing"));
    }
}

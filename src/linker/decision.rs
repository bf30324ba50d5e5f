//! Per-entry decisions for linking and unlinking.
//!
//! Everything here except [`probe`] is a pure function of the target state,
//! so the conflict rules can be tested without any filesystem.
use std::path::{Path, PathBuf};

use crate::error::SymError;
use crate::operations::{EntryKind, FileSystemOps};

/// What occupies a target path, as seen without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// Nothing exists at the path.
    Missing,
    /// A symlink storing this destination.
    Symlink(PathBuf),
    /// A file, directory or special file.
    Occupied(EntryKind),
}

/// Inspect `target` without following a final symlink.
///
/// # Errors
///
/// Returns [`SymError::Io`] if the path cannot be inspected or a symlink at
/// it cannot be read.
pub fn probe(fs: &dyn FileSystemOps, target: &Path) -> Result<TargetState, SymError> {
    match fs
        .entry_kind(target)
        .map_err(SymError::io("inspect", target))?
    {
        None => Ok(TargetState::Missing),
        Some(EntryKind::Symlink) => fs
            .read_link(target)
            .map(TargetState::Symlink)
            .map_err(SymError::io("read symlink", target)),
        Some(kind) => Ok(TargetState::Occupied(kind)),
    }
}

/// Outcome of the single-entry linking rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    /// Create `target -> source`.
    Create,
    /// The correct link is already in place.
    AlreadyLinked,
}

/// Decide what to do for a package file whose target is in `state`.
///
/// # Errors
///
/// Returns a conflict if the target is a symlink to somewhere else or is not
/// a symlink at all.
pub fn decide_link(
    state: &TargetState,
    source: &Path,
    target: &Path,
) -> Result<LinkAction, SymError> {
    match state {
        TargetState::Missing => Ok(LinkAction::Create),
        TargetState::Symlink(dest) if paths_equal(dest, source) => Ok(LinkAction::AlreadyLinked),
        TargetState::Symlink(dest) => Err(SymError::LinkConflict {
            target: target.to_path_buf(),
            expected: source.to_path_buf(),
            actual: dest.clone(),
        }),
        TargetState::Occupied(_) => Err(SymError::NotASymlink {
            target: target.to_path_buf(),
        }),
    }
}

/// Outcome of the single-entry unlinking rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlinkAction {
    /// The target is our link; remove it.
    Remove,
    /// Nothing at the target.
    Absent,
    /// The target is a real file or directory; leave it.
    NotSymlink,
    /// The target links somewhere else; leave it.
    Foreign(PathBuf),
}

/// Decide what to do for a package file whose target is in `state`.
///
/// Never fails: every divergent state is tolerated.
#[must_use]
pub fn decide_unlink(state: &TargetState, source: &Path) -> UnlinkAction {
    match state {
        TargetState::Missing => UnlinkAction::Absent,
        TargetState::Occupied(_) => UnlinkAction::NotSymlink,
        TargetState::Symlink(dest) if paths_equal(dest, source) => UnlinkAction::Remove,
        TargetState::Symlink(dest) => UnlinkAction::Foreign(dest.clone()),
    }
}

/// Outcome for a package directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirAction {
    /// Create the target directory.
    Create,
    /// A directory (or a symlink resolving to one) is already there.
    Exists,
}

/// Decide what to do for a package directory.
///
/// `resolves_to_dir` is whether the target is a directory once symlinks are
/// followed.
///
/// # Errors
///
/// Returns [`SymError::NotADirectory`] if something other than a directory
/// occupies the target.
pub fn decide_dir(
    state: &TargetState,
    resolves_to_dir: bool,
    target: &Path,
) -> Result<DirAction, SymError> {
    if resolves_to_dir {
        return Ok(DirAction::Exists);
    }
    match state {
        TargetState::Missing => Ok(DirAction::Create),
        TargetState::Symlink(_) | TargetState::Occupied(_) => Err(SymError::NotADirectory {
            target: target.to_path_buf(),
        }),
    }
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    s.strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from)
}

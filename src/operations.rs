//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that traversal and link decisions
//! can be unit-tested without touching the real filesystem.  Production code
//! uses [`SystemFileSystemOps`]; tests use `MockFileSystemOps`, an in-memory
//! tree.

use std::io;
use std::path::{Path, PathBuf};

/// Kind of a directory entry, as reported without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A real directory.
    Dir,
    /// A regular file.
    File,
    /// A symbolic link (to anything, possibly dangling).
    Symlink,
    /// Anything else: FIFO, socket, device node.
    Other,
}

impl EntryKind {
    /// Map a [`std::fs::FileType`] onto an entry kind.
    #[must_use]
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Dir
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Abstraction over the filesystem calls made by the linker.
///
/// Implement this trait to swap in a mock during unit tests, keeping the
/// traversal and decision logic independent of real I/O.  The production
/// implementation is [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Probe `path` without following a final symlink.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read the destination stored in the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Permission bits of the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn dir_mode(&self, path: &Path) -> io::Result<u32>;

    /// Create `path` and any missing ancestors with permission bits `mode`.
    ///
    /// Succeeds without change if `path` is already a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any component cannot be created.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Create a symbolic link at `link` storing the destination `original`.
    ///
    /// # Errors
    ///
    /// Returns an error if `link` already exists or cannot be created.
    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()>;

    /// Remove the file, symlink or empty directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) => Ok(Some(EntryKind::from_file_type(meta.file_type()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect()
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    #[cfg(unix)]
    fn dir_mode(&self, path: &Path) -> io::Result<u32> {
        use std::os::unix::fs::PermissionsExt as _;
        Ok(std::fs::metadata(path)?.permissions().mode() & 0o7777)
    }

    #[cfg(not(unix))]
    fn dir_mode(&self, path: &Path) -> io::Result<u32> {
        std::fs::metadata(path).map(|_| DEFAULT_DIR_MODE)
    }

    #[cfg(unix)]
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::DirBuilderExt as _;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(mode)
            .create(path)
    }

    #[cfg(not(unix))]
    fn create_dir_all(&self, path: &Path, _mode: u32) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(original, link)
        }

        #[cfg(windows)]
        {
            if original.is_dir() {
                std::os::windows::fs::symlink_dir(original, link)
            } else {
                std::os::windows::fs::symlink_file(original, link)
            }
        }
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_dir() {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}

/// Permission bits for directories created without a source to copy from.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// A node in the [`MockFileSystemOps`] tree.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockNode {
    /// Directory with its permission bits.
    Dir(u32),
    /// Regular file.
    File,
    /// Symbolic link storing a destination.
    Symlink(PathBuf),
}

/// In-memory [`FileSystemOps`] for unit tests.
///
/// Build the initial tree with the builder-style methods, run the code under
/// test, then inspect the result with [`node`](Self::node),
/// [`snapshot`](Self::snapshot) and [`mutations`](Self::mutations).
/// Paths registered with [`failing_on`](Self::failing_on) reject every
/// mutating call with `PermissionDenied`.
///
/// # Example
///
/// ```ignore
/// let fs = MockFileSystemOps::new()
///     .with_file("/src/vim/.vimrc")
///     .with_dir("/home/u");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    nodes: std::sync::Mutex<std::collections::BTreeMap<PathBuf, MockNode>>,
    failing: Vec<PathBuf>,
    mutations: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        let mock = Self::default();
        mock.insert(PathBuf::from("/"), MockNode::Dir(DEFAULT_DIR_MODE));
        mock
    }

    /// Add a directory (and any missing ancestors) with mode `0o755`.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.with_dir_mode(path, DEFAULT_DIR_MODE)
    }

    /// Add a directory with explicit permission bits.
    #[must_use]
    pub fn with_dir_mode(self, path: impl Into<PathBuf>, mode: u32) -> Self {
        let path = path.into();
        self.insert_ancestors(&path);
        self.insert(path, MockNode::Dir(mode));
        self
    }

    /// Add a regular file (and any missing ancestor directories).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.insert_ancestors(&path);
        self.insert(path, MockNode::File);
        self
    }

    /// Add a symbolic link at `path` storing `target`.
    #[must_use]
    pub fn with_symlink(self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.insert_ancestors(&path);
        self.insert(path, MockNode::Symlink(target.into()));
        self
    }

    /// Make every mutating call on `path` fail with `PermissionDenied`.
    #[must_use]
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.push(path.into());
        self
    }

    /// The node stored at `path`, if any.
    pub fn node(&self, path: impl AsRef<Path>) -> Option<MockNode> {
        self.lock().get(path.as_ref()).cloned()
    }

    /// A copy of the whole tree.
    pub fn snapshot(&self) -> std::collections::BTreeMap<PathBuf, MockNode> {
        self.lock().clone()
    }

    /// Number of mutating calls made so far, successful or not.
    pub fn mutations(&self) -> usize {
        self.mutations.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, std::collections::BTreeMap<PathBuf, MockNode>> {
        self.nodes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn insert(&self, path: PathBuf, node: MockNode) {
        self.lock().insert(path, node);
    }

    fn insert_ancestors(&self, path: &Path) {
        let mut nodes = self.lock();
        for ancestor in path.ancestors().skip(1) {
            nodes
                .entry(ancestor.to_path_buf())
                .or_insert(MockNode::Dir(DEFAULT_DIR_MODE));
        }
    }

    /// Count a mutating call and apply the failure injection.
    fn begin_mutation(&self, path: &Path) -> io::Result<()> {
        self.mutations
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.failing.iter().any(|p| p == path) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Ok(())
    }

    /// Follow symlinks from `path` to the node they finally resolve to.
    fn resolve(&self, path: &Path) -> Option<MockNode> {
        let nodes = self.lock();
        let mut current = path.to_path_buf();
        for _ in 0..16 {
            match nodes.get(&current)? {
                MockNode::Symlink(target) => current = target.clone(),
                node => return Some(node.clone()),
            }
        }
        None
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        Ok(self.node(path).map(|node| match node {
            MockNode::Dir(_) => EntryKind::Dir,
            MockNode::File => EntryKind::File,
            MockNode::Symlink(_) => EntryKind::Symlink,
        }))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.resolve(path), Some(MockNode::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(self
            .lock()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        match self.node(path) {
            Some(MockNode::Symlink(target)) => Ok(target),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn dir_mode(&self, path: &Path) -> io::Result<u32> {
        match self.resolve(path) {
            Some(MockNode::Dir(mode)) => Ok(mode),
            _ => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.begin_mutation(path)?;
        let mut nodes = self.lock();
        let missing: Vec<PathBuf> = path
            .ancestors()
            .take_while(|p| !nodes.contains_key(*p))
            .map(Path::to_path_buf)
            .collect();
        if let Some(node) = nodes.get(path)
            && !matches!(node, MockNode::Dir(_))
        {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        for dir in missing {
            nodes.insert(dir, MockNode::Dir(mode));
        }
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()> {
        self.begin_mutation(link)?;
        if self.node(link).is_some() {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        if !link.parent().is_some_and(|p| self.is_dir(p)) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.insert(link.to_path_buf(), MockNode::Symlink(original.to_path_buf()));
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.begin_mutation(path)?;
        self.lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

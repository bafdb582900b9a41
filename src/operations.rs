//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the linker can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::io;
use std::path::{Path, PathBuf};

/// What a path refers to, without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or any non-directory, non-symlink entry).
    File,
    /// A real directory.
    Dir,
    /// A symbolic link (possibly dangling).
    Symlink,
}

/// Abstraction over the filesystem calls used by the linker.
///
/// Every method is a single metadata query or a single mutation, so the
/// per-entry case analysis in [`crate::resources::symlink`] stays free of
/// direct I/O.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Whether `path` exists, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined, e.g. a parent
    /// directory is not searchable.  Absence is `Ok(false)`, never an error.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Classify `path` without following a final symlink.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata query fails for a reason other than
    /// the path being absent (e.g. a parent directory is not searchable).
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Read the destination of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Resolve `path` to an absolute path with all symlinks followed.
    ///
    /// # Errors
    ///
    /// Returns an error if any component does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create a symbolic link at `link` pointing to `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created (parent missing,
    /// permission denied, something already at `link`, …).
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;

    /// Remove the symbolic link at `link` (never its destination).
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_symlink(&self, link: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(Some(EntryKind::Symlink)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, link)
        }

        #[cfg(windows)]
        {
            if source.is_dir() {
                std::os::windows::fs::symlink_dir(source, link)
            } else {
                std::os::windows::fs::symlink_file(source, link)
            }
        }
    }

    fn remove_symlink(&self, link: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(link)?;
        if is_dir_like(&meta) {
            std::fs::remove_dir(link)
        } else {
            std::fs::remove_file(link)
        }
    }
}

/// Check if metadata represents a directory-like entry.
///
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, which must nevertheless be removed with `remove_dir`, so the
/// raw `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir() && !meta.file_type().is_symlink()
    }
}

#[cfg(test)]
pub use mock::MockFileSystemOps;

#[cfg(test)]
mod mock {
    use std::collections::{HashMap, HashSet};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::{EntryKind, FileSystemOps};

    #[derive(Debug, Clone)]
    enum Node {
        File,
        Dir,
        Symlink(PathBuf),
    }

    #[derive(Debug, Default)]
    struct State {
        nodes: HashMap<PathBuf, Node>,
        created: Vec<PathBuf>,
        removed: Vec<PathBuf>,
    }

    /// In-memory [`FileSystemOps`] for unit tests.
    ///
    /// Pre-populate files, directories and symlinks with the builder-style
    /// methods.  Mutations (`symlink`, `remove_symlink`) update the in-memory
    /// tree so that idempotence can be observed across calls, and are
    /// recorded so tests can assert that nothing was touched.
    ///
    /// ```ignore
    /// let fs = MockFileSystemOps::new()
    ///     .with_file("/repo/aliases")
    ///     .with_dir("/home/user")
    ///     .with_failure("/home/user/.aliases", io::ErrorKind::PermissionDenied);
    /// ```
    #[derive(Debug, Default)]
    pub struct MockFileSystemOps {
        state: Mutex<State>,
        failures: HashMap<PathBuf, io::ErrorKind>,
        unreadable: HashSet<PathBuf>,
        races: HashMap<PathBuf, Node>,
    }

    impl MockFileSystemOps {
        /// Create an empty mock filesystem.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn insert(self, path: impl Into<PathBuf>, node: Node) -> Self {
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .nodes
                .insert(path.into(), node);
            self
        }

        /// Register a regular file at `path`.
        #[must_use]
        pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
            self.insert(path, Node::File)
        }

        /// Register a directory at `path`.
        #[must_use]
        pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
            self.insert(path, Node::Dir)
        }

        /// Register a symlink at `path` pointing to `dest`.
        #[must_use]
        pub fn with_symlink(self, path: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
            self.insert(path, Node::Symlink(dest.into()))
        }

        /// Make every mutation on `path` fail with `kind`.
        #[must_use]
        pub fn with_failure(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
            self.failures.insert(path.into(), kind);
            self
        }

        /// Make metadata and existence queries on `path` fail with
        /// `PermissionDenied`.
        #[must_use]
        pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
            self.unreadable.insert(path.into());
            self
        }

        /// Have another writer put a regular file at `path` just before
        /// `symlink` gets there.
        #[must_use]
        pub fn with_race_file(mut self, path: impl Into<PathBuf>) -> Self {
            self.races.insert(path.into(), Node::File);
            self
        }

        /// Have another writer put a symlink to `dest` at `path` just before
        /// `symlink` gets there.
        #[must_use]
        pub fn with_race_symlink(
            mut self,
            path: impl Into<PathBuf>,
            dest: impl Into<PathBuf>,
        ) -> Self {
            self.races.insert(path.into(), Node::Symlink(dest.into()));
            self
        }

        /// Paths at which a symlink was created, in call order.
        #[must_use]
        pub fn created(&self) -> Vec<PathBuf> {
            self.lock().created.clone()
        }

        /// Paths from which a symlink was removed, in call order.
        #[must_use]
        pub fn removed(&self) -> Vec<PathBuf> {
            self.lock().removed.clone()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, State> {
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        fn fail(&self, path: &Path) -> io::Result<()> {
            self.failures
                .get(path)
                .map_or(Ok(()), |kind| Err(io::Error::from(*kind)))
        }

        /// Follow symlinks from `path` until a non-link node is reached.
        fn resolve(&self, path: &Path) -> Option<PathBuf> {
            let state = self.lock();
            let mut current = path.to_path_buf();
            for _ in 0..32 {
                match state.nodes.get(&current)? {
                    Node::Symlink(dest) => {
                        current = if dest.is_absolute() {
                            dest.clone()
                        } else {
                            current.parent().unwrap_or_else(|| Path::new("/")).join(dest)
                        };
                    }
                    Node::File | Node::Dir => return Some(current),
                }
            }
            None
        }
    }

    impl FileSystemOps for MockFileSystemOps {
        fn exists(&self, path: &Path) -> io::Result<bool> {
            if self.unreadable.contains(path) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Ok(self.resolve(path).is_some())
        }

        fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
            if self.unreadable.contains(path) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Ok(self.lock().nodes.get(path).map(|node| match node {
                Node::File => EntryKind::File,
                Node::Dir => EntryKind::Dir,
                Node::Symlink(_) => EntryKind::Symlink,
            }))
        }

        fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
            match self.lock().nodes.get(path) {
                Some(Node::Symlink(dest)) => Ok(dest.clone()),
                Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
                None => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            self.resolve(path)
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }

        fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
            self.fail(link)?;
            let mut state = self.lock();
            if let Some(node) = self.races.get(link) {
                state.nodes.insert(link.to_path_buf(), node.clone());
            }
            if state.nodes.contains_key(link) {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            let parent_is_dir = link
                .parent()
                .is_some_and(|p| matches!(state.nodes.get(p), Some(Node::Dir)));
            if !parent_is_dir {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            state
                .nodes
                .insert(link.to_path_buf(), Node::Symlink(source.to_path_buf()));
            state.created.push(link.to_path_buf());
            Ok(())
        }

        fn remove_symlink(&self, link: &Path) -> io::Result<()> {
            self.fail(link)?;
            let mut state = self.lock();
            match state.nodes.get(link) {
                Some(Node::Symlink(_)) => {
                    state.nodes.remove(link);
                    state.removed.push(link.to_path_buf());
                    Ok(())
                }
                Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
                None => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }
    }
}

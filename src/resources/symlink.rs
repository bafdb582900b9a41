//! Symlink resource.
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::{LinkState, LinkStatus, Occupant, Resource};
use crate::error::LinkError;
use crate::operations::{EntryKind, FileSystemOps};

/// What lives at the target, independent of whether the source exists.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetState {
    Absent,
    Linked,
    Occupied(Occupant),
}

/// A symlink resource that can be checked, applied, and removed.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink lives).
    pub target: PathBuf,
    fs: Arc<dyn FileSystemOps>,
}

impl SymlinkResource {
    /// Create a new symlink resource operating through `fs`.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, fs: Arc<dyn FileSystemOps>) -> Self {
        Self { source, target, fs }
    }

    fn io_err(&self, e: io::Error) -> LinkError {
        LinkError::from_io(&self.target, e)
    }

    fn target_state(&self) -> Result<TargetState, LinkError> {
        let kind = self
            .fs
            .entry_kind(&self.target)
            .map_err(|e| self.io_err(e))?;
        Ok(match kind {
            None => TargetState::Absent,
            Some(EntryKind::File) => TargetState::Occupied(Occupant::File),
            Some(EntryKind::Dir) => TargetState::Occupied(Occupant::Directory),
            Some(EntryKind::Symlink) => {
                let dest = self.fs.read_link(&self.target).map_err(|e| self.io_err(e))?;
                if self.points_at_source(&dest) {
                    TargetState::Linked
                } else {
                    TargetState::Occupied(Occupant::Symlink(dest))
                }
            }
        })
    }

    /// Whether a link destination read from the target names the source.
    ///
    /// Relative destinations are interpreted against the link's parent
    /// directory.  Lexical equality is checked first so that a dangling link
    /// to the expected source still counts as ours.  Otherwise only the
    /// parent directories are resolved: the final component must name the
    /// source itself, not whatever the source happens to point at.
    fn points_at_source(&self, dest: &Path) -> bool {
        let resolved = if dest.is_absolute() {
            dest.to_path_buf()
        } else {
            self.target
                .parent()
                .map_or_else(|| dest.to_path_buf(), |parent| parent.join(dest))
        };
        if paths_equal(&resolved, &self.source) {
            return true;
        }
        match (self.anchor(&resolved), self.anchor(&self.source)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// `path` with its parent directory canonicalized and its final
    /// component left as written.
    fn anchor(&self, path: &Path) -> Option<PathBuf> {
        let path = normalize(path);
        let name = path.file_name()?;
        let parent = self.fs.canonicalize(path.parent()?).ok()?;
        Some(parent.join(name))
    }

    fn source_exists(&self) -> Result<bool, LinkError> {
        self.fs
            .exists(&self.source)
            .map_err(|e| LinkError::from_io(&self.source, e))
    }

    fn create(&self) -> Result<LinkStatus, LinkError> {
        match self.fs.symlink(&self.source, &self.target) {
            Ok(()) => Ok(LinkStatus::Created),
            // Lost a race with another writer: report what is there now.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match self.target_state()? {
                TargetState::Linked => Ok(LinkStatus::AlreadyLinked),
                TargetState::Occupied(found) => Err(LinkError::Conflict {
                    target: self.target.clone(),
                    found,
                }),
                TargetState::Absent => Err(self.io_err(e)),
            },
            Err(e) => Err(self.io_err(e)),
        }
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<LinkState, LinkError> {
        if !self.source_exists()? {
            return Ok(LinkState::SourceMissing);
        }
        Ok(match self.target_state()? {
            TargetState::Absent => LinkState::Absent,
            TargetState::Linked => LinkState::Linked,
            TargetState::Occupied(found) => LinkState::Occupied(found),
        })
    }

    fn apply(&self, dry_run: bool) -> Result<LinkStatus, LinkError> {
        if !self.source_exists()? {
            return Err(LinkError::SourceMissing {
                source_path: self.source.clone(),
            });
        }
        match self.target_state()? {
            TargetState::Linked => Ok(LinkStatus::AlreadyLinked),
            TargetState::Occupied(found) => Err(LinkError::Conflict {
                target: self.target.clone(),
                found,
            }),
            TargetState::Absent if dry_run => Ok(LinkStatus::Created),
            TargetState::Absent => self.create(),
        }
    }

    fn remove(&self, dry_run: bool) -> Result<LinkStatus, LinkError> {
        match self.target_state()? {
            TargetState::Absent => Ok(LinkStatus::NotLinked),
            TargetState::Occupied(found) => Err(LinkError::Conflict {
                target: self.target.clone(),
                found,
            }),
            TargetState::Linked if dry_run => Ok(LinkStatus::Removed),
            TargetState::Linked => {
                self.fs
                    .remove_symlink(&self.target)
                    .map_err(|e| self.io_err(e))?;
                Ok(LinkStatus::Removed)
            }
        }
    }
}

/// Compare two paths after lexical normalization, also stripping the `\\?\`
/// prefix that Windows `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
fn normalize(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    let p = s
        .strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from);

    let mut out = PathBuf::new();
    for component in p.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

//! Idempotent resource primitives (check + apply pattern).
pub mod symlink;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::LinkError;

/// Unified interface for resources that can be checked, applied, and removed.
///
/// `apply` and `remove` perform the full per-entry case analysis themselves,
/// so calling either twice in a row is always safe.  With `dry_run` set they
/// return the outcome they *would* produce without mutating anything.
///
/// # Examples
///
/// ```ignore
/// // Every resource follows the same check-then-apply pattern:
/// if !resource.is_satisfied()? {
///     resource.apply(false)?;
/// }
/// ```
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.  Never mutates.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined, e.g. a parent
    /// directory of the target is not searchable.
    fn current_state(&self) -> Result<LinkState, LinkError>;

    /// Bring the resource into the desired state.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] when the source is missing, the target is
    /// occupied, or the filesystem refuses the change.
    fn apply(&self, dry_run: bool) -> Result<LinkStatus, LinkError>;

    /// Undo a previous [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] when the target is occupied by something this
    /// resource does not own, or the filesystem refuses the change.
    fn remove(&self, dry_run: bool) -> Result<LinkStatus, LinkError>;

    /// Whether the resource is already in the desired state.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn is_satisfied(&self) -> Result<bool, LinkError> {
        Ok(self.current_state()? == LinkState::Linked)
    }
}

/// What currently occupies a target path that is not the expected link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "points_to", rename_all = "snake_case")]
pub enum Occupant {
    /// A regular file.
    File,
    /// A real directory.
    Directory,
    /// A symlink to somewhere other than the source (possibly dangling).
    Symlink(PathBuf),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "a regular file"),
            Self::Directory => write!(f, "a directory"),
            Self::Symlink(dest) => write!(f, "a symlink to {}", dest.display()),
        }
    }
}

/// Read-only classification of a link entry.
///
/// # Examples
///
/// ```
/// use dotlink::resources::{LinkState, Occupant};
///
/// let ok = LinkState::Linked;
/// let file = LinkState::Occupied(Occupant::File);
///
/// assert_ne!(ok, file);
/// assert_eq!(ok.label(), "linked");
/// assert_eq!(file.label(), "conflict");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Target is a symlink resolving to the source.
    Linked,
    /// Nothing exists at the target.
    Absent,
    /// The source does not exist.
    SourceMissing,
    /// Target is occupied by something else.
    Occupied(Occupant),
}

impl LinkState {
    /// Short label used in `verify` output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::Absent => "absent",
            Self::SourceMissing => "source-missing",
            Self::Occupied(_) => "conflict",
        }
    }
}

/// Successful outcome of applying or removing one entry.
///
/// # Examples
///
/// ```
/// use dotlink::resources::LinkStatus;
///
/// assert_eq!(LinkStatus::Created.label(false), "created");
/// assert_eq!(LinkStatus::Created.label(true), "would-create");
/// assert_eq!(LinkStatus::AlreadyLinked.label(true), "already-linked");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// A new symlink was created.
    Created,
    /// The target already pointed at the source; nothing changed.
    AlreadyLinked,
    /// The symlink was removed.
    Removed,
    /// Nothing existed at the target; nothing to remove.
    NotLinked,
}

impl LinkStatus {
    /// Short label used in per-entry report lines.
    #[must_use]
    pub const fn label(self, dry_run: bool) -> &'static str {
        match (self, dry_run) {
            (Self::Created, false) => "created",
            (Self::Created, true) => "would-create",
            (Self::Removed, false) => "removed",
            (Self::Removed, true) => "would-remove",
            (Self::AlreadyLinked, _) => "already-linked",
            (Self::NotLinked, _) => "not-linked",
        }
    }
}

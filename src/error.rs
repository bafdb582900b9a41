//! Domain-specific error types for the dotlink engine.
//!
//! Internal modules return typed errors built with [`thiserror`], while the
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! - [`LinkError`]: per-entry failures; never abort the batch
//! - [`ConfigError`]: loading and resolving the link file
//! - [`HookError`]: post-apply hook execution

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::resources::Occupant;

/// A per-entry failure produced by apply, remove, or inspect.
///
/// These are collected into the report rather than propagated, so one bad
/// entry never prevents the remaining entries from being processed.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The configured source does not exist in the repository checkout.
    #[error("source does not exist: {}", source_path.display())]
    SourceMissing {
        /// The source path that was expected to exist.
        source_path: PathBuf,
    },

    /// The target is occupied by something other than the expected symlink.
    #[error("target {} is occupied by {found}", target.display())]
    Conflict {
        /// The occupied target path.
        target: PathBuf,
        /// What currently lives at the target.
        found: Occupant,
    },

    /// The filesystem refused the operation.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path the operation was attempted on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Any other filesystem failure (missing parent directory, read-only
    /// filesystem, …).
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        /// Path the operation was attempted on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl LinkError {
    /// Classify an I/O error raised while operating on `path`.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Short machine-friendly label used in per-entry report lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SourceMissing { .. } => "source-missing",
            Self::Conflict { .. } => "conflict",
            Self::PermissionDenied { .. } => "permission-denied",
            Self::Io { .. } => "io-failure",
        }
    }
}

/// Errors that arise while loading and resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The link file does not exist.
    #[error("config file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The link file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The link file is not valid TOML or does not match the schema.
    #[error("invalid TOML in {}: {source}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying parser error.
        source: toml::de::Error,
    },

    /// The repository root does not exist or cannot be resolved.
    #[error("cannot resolve repository root {}: {source}", path.display())]
    Root {
        /// Root path as given.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A path could not be expanded (e.g. it references an unset variable).
    #[error("cannot expand '{value}': {message}")]
    Expand {
        /// The raw path as written in the config.
        value: String,
        /// Human-readable reason.
        message: String,
    },

    /// No home directory was given and none could be detected.
    #[error("cannot determine home directory; pass --home")]
    NoHome,
}

/// Errors that arise while running post-apply hooks.
#[derive(Error, Debug)]
pub enum HookError {
    /// The hook program is not on `PATH`.
    #[error("hook '{name}': program '{program}' not found on PATH")]
    NotFound {
        /// Hook name from the config.
        name: String,
        /// Program that could not be located.
        program: String,
    },

    /// The hook could not be started.
    #[error("hook '{name}' could not be started: {message}")]
    Spawn {
        /// Hook name from the config.
        name: String,
        /// Human-readable reason.
        message: String,
    },

    /// The hook exited with a non-zero status.
    #[error("hook '{name}' failed (exit {code}): {stderr}")]
    Failed {
        /// Hook name from the config.
        name: String,
        /// Exit code, or `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

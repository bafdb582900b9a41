//! The dotfile linker: apply, verify, inspect, and remove over an ordered
//! list of [`LinkSpec`]s.
//!
//! Entries are independent.  A failure on one entry is recorded in that
//! entry's result and never stops the others.  Results always come back in
//! input order, whether or not entries were processed in parallel.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use dotlink::linker::{LinkSpec, Linker};
//! use dotlink::logging::Logger;
//! use dotlink::operations::SystemFileSystemOps;
//!
//! let specs = vec![LinkSpec::new(
//!     PathBuf::from("/repo/aliases"),
//!     PathBuf::from("/home/user/.aliases"),
//! )];
//! let linker = Linker::new(Arc::new(SystemFileSystemOps));
//! let log = Logger::new("apply");
//! let report = linker.apply(&specs, &log);
//! assert!(report.is_success());
//! ```

mod parallel;
pub mod report;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

pub use report::{InspectResult, Inspection, LinkResult, Operation, Report};

use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{LinkStatus, Resource};

/// A requested source → target symlink pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LinkSpec {
    /// Existing file or directory inside the repository checkout.
    pub source: PathBuf,
    /// Where the symlink should live.
    pub target: PathBuf,
}

impl LinkSpec {
    /// Create a new spec.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for LinkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.target.display(), self.source.display())
    }
}

/// Applies, verifies, and removes dotfile symlinks.
#[derive(Debug, Clone)]
pub struct Linker {
    fs: Arc<dyn FileSystemOps>,
    parallel: bool,
    dry_run: bool,
}

impl Linker {
    /// Create a linker over `fs`.  Parallel processing is on by default.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs,
            parallel: true,
            dry_run: false,
        }
    }

    /// Enable or disable parallel processing.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn resource(&self, spec: &LinkSpec) -> SymlinkResource {
        SymlinkResource::new(
            spec.source.clone(),
            spec.target.clone(),
            Arc::clone(&self.fs),
        )
    }

    /// Create every missing link.  Never overwrites an existing target.
    pub fn apply(&self, specs: &[LinkSpec], log: &dyn Log) -> Report {
        self.run(Operation::Apply, specs, log)
    }

    /// Delete every link that points at its source.  Never deletes anything
    /// else.
    pub fn remove(&self, specs: &[LinkSpec], log: &dyn Log) -> Report {
        self.run(Operation::Remove, specs, log)
    }

    /// Classify every entry without mutating anything.
    pub fn inspect(&self, specs: &[LinkSpec], log: &dyn Log) -> Inspection {
        let results = parallel::map_entries(specs, self.parallel, log, |spec, entry_log| {
            let resource = self.resource(spec);
            let state = resource.current_state();
            match &state {
                Ok(s) => entry_log.debug(&format!("{}: {}", s.label(), resource.description())),
                Err(e) => entry_log.warn(&format!("cannot inspect {}: {e}", resource.description())),
            }
            InspectResult {
                spec: spec.clone(),
                state,
            }
        });
        Inspection { results }
    }

    /// `true` per entry iff the source exists and the target links to it.
    pub fn verify(&self, specs: &[LinkSpec], log: &dyn Log) -> Vec<bool> {
        self.inspect(specs, log).verdicts()
    }

    fn run(&self, operation: Operation, specs: &[LinkSpec], log: &dyn Log) -> Report {
        let dry_run = self.dry_run;
        let results = parallel::map_entries(specs, self.parallel, log, |spec, entry_log| {
            let resource = self.resource(spec);
            let desc = resource.description();
            let outcome = match operation {
                Operation::Apply => resource.apply(dry_run),
                Operation::Remove => resource.remove(dry_run),
            };
            match &outcome {
                Ok(status @ (LinkStatus::Created | LinkStatus::Removed)) if dry_run => {
                    entry_log.dry_run(&format!("{}: {desc}", status.label(true)));
                }
                Ok(status) => entry_log.debug(&format!("{}: {desc}", status.label(false))),
                Err(e) => entry_log.warn(&format!("failed to {operation} {desc}: {e}")),
            }
            LinkResult {
                spec: spec.clone(),
                outcome,
            }
        });
        Report {
            operation,
            dry_run,
            results,
        }
    }
}

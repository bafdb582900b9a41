//! Per-entry results and the batch report rendered by the commands.
use std::fmt;

use serde::Serialize;

use super::LinkSpec;
use crate::error::LinkError;
use crate::resources::{LinkState, LinkStatus};

/// Which mutating operation produced a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create missing links.
    Apply,
    /// Delete links that point at their sources.
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply => write!(f, "apply"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Outcome of one apply or remove on one [`LinkSpec`].
#[derive(Debug)]
pub struct LinkResult {
    /// The entry this result belongs to.
    pub spec: LinkSpec,
    /// Success status, or the per-entry error.
    pub outcome: Result<LinkStatus, LinkError>,
}

impl LinkResult {
    /// Whether the entry ended in a success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Status label, e.g. `created`, `would-remove`, or `conflict`.
    #[must_use]
    pub const fn label(&self, dry_run: bool) -> &'static str {
        match &self.outcome {
            Ok(status) => status.label(dry_run),
            Err(e) => e.label(),
        }
    }

    /// The `<status> <target> -> <source>` line printed for this entry.
    #[must_use]
    pub fn line(&self, dry_run: bool) -> String {
        format!("{} {}", self.label(dry_run), self.spec)
    }
}

/// Ordered results of one apply or remove run.
#[derive(Debug)]
pub struct Report {
    /// Which operation ran.
    pub operation: Operation,
    /// Whether mutations were skipped.
    pub dry_run: bool,
    /// One result per spec, in input order.
    pub results: Vec<LinkResult>,
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    status: &'static str,
    target: &'a std::path::Path,
    source: &'a std::path::Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportRecord<'a> {
    operation: Operation,
    dry_run: bool,
    success: bool,
    summary: String,
    results: Vec<ResultRecord<'a>>,
}

impl Report {
    /// `true` iff every entry succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.results.iter().all(LinkResult::is_success)
    }

    /// Number of entries that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    /// Per-label counts, in first-seen order.
    #[must_use]
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        tally(self.results.iter().map(|r| r.label(self.dry_run)))
    }

    /// One-line summary, e.g. `"2 created, 3 already linked, 1 conflict"`.
    #[must_use]
    pub fn summary(&self) -> String {
        summarize(&self.counts())
    }

    /// One rendered line per entry.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.results.iter().map(|r| r.line(self.dry_run)).collect()
    }

    /// Serialize the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let record = ReportRecord {
            operation: self.operation,
            dry_run: self.dry_run,
            success: self.is_success(),
            summary: self.summary(),
            results: self
                .results
                .iter()
                .map(|r| ResultRecord {
                    status: r.label(self.dry_run),
                    target: &r.spec.target,
                    source: &r.spec.source,
                    error: r.outcome.as_ref().err().map(ToString::to_string),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&record)
    }
}

/// Read-only classification of one entry, produced by inspect/verify.
#[derive(Debug)]
pub struct InspectResult {
    /// The entry this result belongs to.
    pub spec: LinkSpec,
    /// The observed state, or the error that prevented observing it.
    pub state: Result<LinkState, LinkError>,
}

impl InspectResult {
    /// `true` iff the source exists and the target links to it.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        matches!(self.state, Ok(LinkState::Linked))
    }

    /// State label, e.g. `linked`, `absent`, or `permission-denied`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match &self.state {
            Ok(state) => state.label(),
            Err(e) => e.label(),
        }
    }

    /// The `<state> <target> -> <source>` line printed for this entry.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} {}", self.label(), self.spec)
    }

    fn detail(&self) -> Option<String> {
        match &self.state {
            Ok(LinkState::Occupied(found)) => Some(format!("occupied by {found}")),
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        }
    }
}

/// Ordered results of one verify run.
#[derive(Debug)]
pub struct Inspection {
    /// One result per spec, in input order.
    pub results: Vec<InspectResult>,
}

#[derive(Serialize)]
struct InspectRecord<'a> {
    state: &'static str,
    linked: bool,
    target: &'a std::path::Path,
    source: &'a std::path::Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Serialize)]
struct InspectionRecord<'a> {
    operation: &'static str,
    success: bool,
    summary: String,
    results: Vec<InspectRecord<'a>>,
}

impl Inspection {
    /// `true` iff every entry is linked.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.results.iter().all(InspectResult::is_linked)
    }

    /// One boolean per entry, in input order.
    #[must_use]
    pub fn verdicts(&self) -> Vec<bool> {
        self.results.iter().map(InspectResult::is_linked).collect()
    }

    /// One-line summary, e.g. `"4 linked, 1 absent"`.
    #[must_use]
    pub fn summary(&self) -> String {
        summarize(&tally(self.results.iter().map(InspectResult::label)))
    }

    /// One rendered line per entry.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.results.iter().map(InspectResult::line).collect()
    }

    /// Serialize the inspection as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let record = InspectionRecord {
            operation: "verify",
            success: self.is_success(),
            summary: self.summary(),
            results: self
                .results
                .iter()
                .map(|r| InspectRecord {
                    state: r.label(),
                    linked: r.is_linked(),
                    target: &r.spec.target,
                    source: &r.spec.source,
                    detail: r.detail(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&record)
    }
}

fn tally(labels: impl Iterator<Item = &'static str>) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    counts
}

fn summarize(counts: &[(&'static str, usize)]) -> String {
    if counts.is_empty() {
        return "nothing to do".to_string();
    }
    counts
        .iter()
        .map(|(label, n)| format!("{n} {}", label.replace('-', " ")))
        .collect::<Vec<_>>()
        .join(", ")
}

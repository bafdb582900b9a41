//! Non-fatal configuration checks.
//!
//! Validators never fail loading; they return warnings that the commands log
//! before doing any work.
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::linker::LinkSpec;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new warning.
    #[must_use]
    pub fn new(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item, self.message)
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Checks the resolved link list.
#[derive(Debug)]
pub struct LinkValidator<'a> {
    specs: &'a [LinkSpec],
    root: &'a Path,
}

impl<'a> LinkValidator<'a> {
    /// Create a validator over `specs` resolved against `root`.
    #[must_use]
    pub const fn new(specs: &'a [LinkSpec], root: &'a Path) -> Self {
        Self { specs, root }
    }
}

impl ConfigValidator for LinkValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if self.specs.is_empty() {
            warnings.push(ValidationWarning::new(
                "links",
                "no links are active for the selected profile",
            ));
        }

        let mut seen: HashMap<&Path, &Path> = HashMap::new();
        for spec in self.specs {
            let target = spec.target.display().to_string();

            if spec.target == spec.source {
                warnings.push(ValidationWarning::new(&target, "target is the same as its source"));
            } else if spec.target.starts_with(self.root) {
                warnings.push(ValidationWarning::new(
                    &target,
                    "target is inside the repository root",
                ));
            }

            if let Some(first) = seen.insert(&spec.target, &spec.source) {
                warnings.push(ValidationWarning::new(
                    &target,
                    format!(
                        "duplicate target (also linked from {})",
                        first.display()
                    ),
                ));
            }
        }

        warnings
    }
}

/// Checks the `--profile` values against the categories the file mentions.
#[derive(Debug)]
pub struct ProfileValidator<'a> {
    requested: &'a [String],
    known: &'a BTreeSet<String>,
}

impl<'a> ProfileValidator<'a> {
    /// Create a validator for `requested` profiles.
    #[must_use]
    pub const fn new(requested: &'a [String], known: &'a BTreeSet<String>) -> Self {
        Self { requested, known }
    }
}

impl ConfigValidator for ProfileValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        self.requested
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty() && *p != super::category_matcher::ALL)
            .filter(|p| !self.known.contains(*p))
            .map(|p| ValidationWarning::new(p, "unknown profile category"))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn spec(source: &str, target: &str) -> LinkSpec {
        LinkSpec::new(PathBuf::from(source), PathBuf::from(target))
    }

    #[test]
    fn clean_config_has_no_warnings() {
        let specs = [
            spec("/repo/aliases", "/home/user/.aliases"),
            spec("/repo/bashrc", "/home/user/.bashrc"),
        ];
        assert!(LinkValidator::new(&specs, Path::new("/repo")).validate().is_empty());
    }

    #[test]
    fn empty_link_set_warns() {
        let warnings = LinkValidator::new(&[], Path::new("/repo")).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("no links"));
    }

    #[test]
    fn duplicate_target_warns_once() {
        let specs = [
            spec("/repo/a", "/home/user/.x"),
            spec("/repo/b", "/home/user/.x"),
        ];
        let warnings = LinkValidator::new(&specs, Path::new("/repo")).validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "/home/user/.x: duplicate target (also linked from /repo/a)"
        );
    }

    #[test]
    fn self_link_and_in_repo_target_warn() {
        let specs = [
            spec("/repo/a", "/repo/a"),
            spec("/repo/b", "/repo/nested/.b"),
        ];
        let warnings = LinkValidator::new(&specs, Path::new("/repo")).validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("same as its source"));
        assert!(warnings[1].message.contains("inside the repository root"));
    }

    #[test]
    fn unknown_profile_warns() {
        let known: BTreeSet<String> = ["base", "desktop"].iter().map(ToString::to_string).collect();
        let requested = vec!["desktop".to_string(), "laptop".to_string(), "all".to_string()];
        let warnings = ProfileValidator::new(&requested, &known).validate();
        assert_eq!(warnings, vec![ValidationWarning::new("laptop", "unknown profile category")]);
    }
}

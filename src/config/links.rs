//! Link groups: the `[[group]]` tables of the link file and their
//! resolution into absolute [`LinkSpec`]s.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::category_matcher::ActiveCategories;
use crate::error::ConfigError;
use crate::hooks::Hook;
use crate::linker::LinkSpec;

/// The whole link file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkFile {
    /// Groups in file order.
    #[serde(default, rename = "group")]
    pub groups: Vec<Group>,
    /// Post-apply hooks in file order.
    #[serde(default, rename = "hook")]
    pub hooks: Vec<Hook>,
}

/// A named, category-tagged list of links.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    /// Group name; split on `-` into category tags.
    pub name: String,
    /// Links in file order.
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

/// A single entry in a group: either a plain source path or a structured
/// `{ source, target }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    /// Plain string: `"bashrc"`.  The target is derived by convention.
    Simple(String),
    /// Structured: `{ source = "nvim", target = "~/.config/nvim" }`.
    WithTarget {
        /// Source path, relative to the repository root or absolute.
        source: String,
        /// Target path; derived by convention when omitted.
        #[serde(default)]
        target: Option<String>,
    },
}

impl LinkEntry {
    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            Self::Simple(source) => (source, None),
            Self::WithTarget { source, target } => (source, target.as_deref()),
        }
    }
}

/// Resolves raw link entries into absolute paths.
pub struct Resolver<'a> {
    root: &'a Path,
    home: &'a Path,
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("root", &self.root)
            .field("home", &self.home)
            .finish_non_exhaustive()
    }
}

impl<'a> Resolver<'a> {
    /// Create a resolver.  `lookup` supplies values for `$VAR` expansion.
    #[must_use]
    pub fn new(
        root: &'a Path,
        home: &'a Path,
        lookup: &'a dyn Fn(&str) -> Option<String>,
    ) -> Self {
        Self { root, home, lookup }
    }

    /// Resolve every link of every active group, keeping file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Expand`] if a target references an unset
    /// variable.
    pub fn resolve(
        &self,
        groups: &[Group],
        active: &ActiveCategories,
    ) -> Result<Vec<LinkSpec>, ConfigError> {
        groups
            .iter()
            .filter(|g| active.matches(&g.name))
            .flat_map(|g| g.links.iter())
            .map(|entry| self.resolve_entry(entry))
            .collect()
    }

    /// Resolve a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Expand`] if the target cannot be expanded.
    pub fn resolve_entry(&self, entry: &LinkEntry) -> Result<LinkSpec, ConfigError> {
        let (source, target) = entry.parts();
        let source_path = self.root.join(source);
        let target_path = match target {
            Some(raw) => self.home.join(self.expand(raw)?),
            None => self.derived_target(source),
        };
        Ok(LinkSpec::new(source_path, target_path))
    }

    /// `home/.<source>`; for an absolute source only its file name is used.
    fn derived_target(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        let rel = if path.is_absolute() {
            path.file_name()
                .map_or_else(|| source.to_string(), |n| n.to_string_lossy().into_owned())
        } else {
            source.to_string()
        };
        self.home.join(format!(".{rel}"))
    }

    fn expand(&self, raw: &str) -> Result<PathBuf, ConfigError> {
        let home = self.home.to_string_lossy().into_owned();
        let expanded = shellexpand::full_with_context(
            raw,
            || Some(home.as_str()),
            |var| {
                (self.lookup)(var)
                    .map(Some)
                    .ok_or(std::env::VarError::NotPresent)
            },
        )
        .map_err(|e| ConfigError::Expand {
            value: raw.to_string(),
            message: e.to_string(),
        })?;
        Ok(PathBuf::from(expanded.into_owned()))
    }
}

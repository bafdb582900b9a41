//! Profile categories and group selection.
//!
//! A group name such as `"linux-desktop"` carries the tags `linux` and
//! `desktop`.  The group is active when every one of its tags is active.

use std::collections::BTreeSet;

/// Category that is always active.
pub const BASE: &str = "base";

/// Profile name that activates every group.
pub const ALL: &str = "all";

/// The set of categories active for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveCategories {
    /// Every group is active.
    All,
    /// Only groups whose tags are all in this set.
    Tags(BTreeSet<String>),
}

impl ActiveCategories {
    /// Build the active set from the `--profile` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotlink::config::category_matcher::ActiveCategories;
    ///
    /// let active = ActiveCategories::from_profiles(&["desktop".to_string()]);
    /// assert!(active.matches("base"));
    /// assert!(active.matches("desktop"));
    /// assert!(!active.matches("linux-desktop"));
    ///
    /// let all = ActiveCategories::from_profiles(&["all".to_string()]);
    /// assert!(all.matches("linux-desktop"));
    /// ```
    #[must_use]
    pub fn from_profiles(profiles: &[String]) -> Self {
        if profiles.iter().any(|p| p.trim() == ALL) {
            return Self::All;
        }
        let mut tags: BTreeSet<String> = profiles
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        tags.insert(BASE.to_string());
        Self::Tags(tags)
    }

    /// Whether the group `name` is active.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Tags(active) => tags(name).all(|tag| active.contains(tag)),
        }
    }
}

/// Split a group name into its category tags.
pub fn tags(name: &str) -> impl Iterator<Item = &str> {
    name.split('-').map(str::trim).filter(|t| !t.is_empty())
}

/// Every category mentioned by any of `group_names`, plus `base`.
#[must_use]
pub fn known_categories<'a>(group_names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut known: BTreeSet<String> = group_names
        .into_iter()
        .flat_map(tags)
        .map(str::to_string)
        .collect();
    known.insert(BASE.to_string());
    known
}

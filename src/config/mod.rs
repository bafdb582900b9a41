//! Configuration: resolved settings and the loaded link file.
pub mod category_matcher;
pub mod links;
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};

use category_matcher::ActiveCategories;
use links::{LinkFile, Resolver};
use validation::{ConfigValidator as _, LinkValidator, ProfileValidator, ValidationWarning};

use crate::error::ConfigError;
use crate::hooks::Hook;
use crate::linker::LinkSpec;

/// Default link file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dotlink.toml";

/// Environment variable overriding the link file path.
pub const CONFIG_ENV: &str = "DOTLINK_CONFIG";

/// Environment variable overriding the repository root.
pub const ROOT_ENV: &str = "DOTLINK_ROOT";

/// Values given on the command line, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--config`
    pub config: Option<PathBuf>,
    /// `--root`
    pub root: Option<PathBuf>,
    /// `--home`
    pub home: Option<PathBuf>,
    /// `--profile`
    pub profiles: Vec<String>,
}

/// Fully resolved run settings.  Passed down explicitly; there is no global
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path of the link file.
    pub config_path: PathBuf,
    /// Repository root, before canonicalization.
    pub root: PathBuf,
    /// Home directory used for `~` and relative targets.
    pub home: PathBuf,
    /// Requested profile categories.
    pub profiles: Vec<String>,
}

impl Settings {
    /// Apply the precedence rules: flag, then environment, then default.
    ///
    /// `env` looks up environment variables; `default_home` is consulted
    /// only when `--home` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHome`] if no home directory is available.
    pub fn resolve(
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
        default_home: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config_path = overrides
            .config
            .or_else(|| env(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let root = overrides
            .root
            .or_else(|| env(ROOT_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| config_dir(&config_path));

        let home = overrides
            .home
            .or_else(default_home)
            .ok_or(ConfigError::NoHome)?;

        Ok(Self {
            config_path,
            root,
            home,
            profiles: overrides.profiles,
        })
    }

    /// Resolve against the real process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHome`] if no home directory is available.
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |k| std::env::var(k).ok(), dirs::home_dir)
    }
}

/// Directory holding the config file; `.` for a bare file name.
fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// The loaded, resolved link configuration.
#[derive(Debug)]
pub struct Config {
    /// Canonical repository root.
    pub root: PathBuf,
    /// Home directory.
    pub home: PathBuf,
    /// Active links, in file order.
    pub specs: Vec<LinkSpec>,
    /// Post-apply hooks, in file order.
    pub hooks: Vec<Hook>,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<ValidationWarning>,
}

impl Config {
    /// Load the link file named by `settings`, expanding `$VAR` from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid, the root does not
    /// exist, or a target cannot be expanded.
    pub fn load(settings: &Settings) -> Result<Self, ConfigError> {
        Self::load_with(settings, &|k| std::env::var(k).ok())
    }

    /// Like [`load`](Self::load) with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with(
        settings: &Settings,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: LinkFile = toml_loader::load_config(&settings.config_path)?;

        let root = dunce::canonicalize(&settings.root).map_err(|source| ConfigError::Root {
            path: settings.root.clone(),
            source,
        })?;

        let active = ActiveCategories::from_profiles(&settings.profiles);
        let specs = Resolver::new(&root, &settings.home, lookup).resolve(&file.groups, &active)?;

        let known = category_matcher::known_categories(file.groups.iter().map(|g| g.name.as_str()));
        let mut warnings = ProfileValidator::new(&settings.profiles, &known).validate();
        warnings.extend(LinkValidator::new(&specs, &root).validate());

        Ok(Self {
            root,
            home: settings.home.clone(),
            specs,
            hooks: file.hooks,
            warnings,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |k| {
            pairs
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| (*v).to_string())
        }
    }

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/user"))
    }

    #[test]
    fn defaults_use_working_directory_config() {
        let s = Settings::resolve(Overrides::default(), env_of(&[]), home).unwrap();
        assert_eq!(s.config_path, PathBuf::from("dotlink.toml"));
        assert_eq!(s.root, PathBuf::from("."));
        assert_eq!(s.home, PathBuf::from("/home/user"));
    }

    #[test]
    fn root_defaults_to_config_directory() {
        let s = Settings::resolve(
            Overrides {
                config: Some(PathBuf::from("/repo/dotlink.toml")),
                ..Overrides::default()
            },
            env_of(&[]),
            home,
        )
        .unwrap();
        assert_eq!(s.root, PathBuf::from("/repo"));
    }

    #[test]
    fn environment_beats_default_and_flag_beats_environment() {
        let env = env_of(&[(CONFIG_ENV, "/env/dotlink.toml"), (ROOT_ENV, "/env-root")]);
        let s = Settings::resolve(Overrides::default(), &env, home).unwrap();
        assert_eq!(s.config_path, PathBuf::from("/env/dotlink.toml"));
        assert_eq!(s.root, PathBuf::from("/env-root"));

        let s = Settings::resolve(
            Overrides {
                root: Some(PathBuf::from("/flag-root")),
                ..Overrides::default()
            },
            &env,
            home,
        )
        .unwrap();
        assert_eq!(s.root, PathBuf::from("/flag-root"));
    }

    #[test]
    fn missing_home_is_an_error() {
        let err = Settings::resolve(Overrides::default(), env_of(&[]), || None).unwrap_err();
        assert!(matches!(err, ConfigError::NoHome));
    }

    #[test]
    fn load_resolves_specs_hooks_and_warnings() {
        let repo = tempfile::tempdir().unwrap();
        let config_path = repo.path().join("dotlink.toml");
        std::fs::write(
            &config_path,
            r#"
[[group]]
name = "base"
links = ["aliases", { source = "nvim", target = "~/.config/nvim" }]

[[group]]
name = "desktop"
links = ["xprofile"]

[[hook]]
name = "noop"
program = "true"
"#,
        )
        .unwrap();

        let settings = Settings {
            config_path,
            root: repo.path().to_path_buf(),
            home: PathBuf::from("/home/user"),
            profiles: vec!["laptop".to_string()],
        };
        let config = Config::load_with(&settings, &|_| None).unwrap();
        let root = dunce::canonicalize(repo.path()).unwrap();

        assert_eq!(config.root, root);
        assert_eq!(
            config.specs,
            vec![
                LinkSpec::new(root.join("aliases"), PathBuf::from("/home/user/.aliases")),
                LinkSpec::new(root.join("nvim"), PathBuf::from("/home/user/.config/nvim")),
            ]
        );
        assert_eq!(config.hooks.len(), 1);
        assert_eq!(
            config.warnings,
            vec![ValidationWarning::new("laptop", "unknown profile category")]
        );
    }

    #[test]
    fn load_missing_config_is_not_found() {
        let repo = tempfile::tempdir().unwrap();
        let settings = Settings {
            config_path: repo.path().join("dotlink.toml"),
            root: repo.path().to_path_buf(),
            home: PathBuf::from("/home/user"),
            profiles: Vec::new(),
        };
        assert!(matches!(
            Config::load(&settings).unwrap_err(),
            ConfigError::NotFound { .. }
        ));
    }

    #[test]
    fn load_missing_root_is_an_error() {
        let repo = tempfile::tempdir().unwrap();
        let config_path = repo.path().join("dotlink.toml");
        std::fs::write(&config_path, "").unwrap();
        let settings = Settings {
            config_path,
            root: repo.path().join("does-not-exist"),
            home: PathBuf::from("/home/user"),
            profiles: Vec::new(),
        };
        assert!(matches!(
            Config::load(&settings).unwrap_err(),
            ConfigError::Root { .. }
        ));
    }
}

//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

/// Top-level CLI entry point for the dotfile linker.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Idempotent symlink-based dotfile installer",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Output format for per-entry results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `<status> <target> -> <source>` line per entry.
    #[default]
    Text,
    /// A single JSON document on stdout.
    Json,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Link file (default: $DOTLINK_CONFIG, then ./dotlink.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository root (default: $DOTLINK_ROOT, then the link file's directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Home directory used for `~` and relative targets
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Profile categories to activate, comma-separated (`all` for every group)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub profile: Vec<String>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Disable parallel processing of entries (parallel is enabled by default)
    #[arg(long = "no-parallel", global = true, action = clap::ArgAction::SetFalse)]
    pub parallel: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Do not run post-apply hooks
    #[arg(long, global = true)]
    pub no_hooks: bool,
}

impl GlobalOpts {
    /// The path-related flags, before defaults are applied.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            root: self.root.clone(),
            home: self.home.clone(),
            profiles: self.profile.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create every missing symlink; never overwrite
    Apply,
    /// Check that every symlink is in place
    Verify,
    /// Delete symlinks that point into the repository
    Remove,
    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Verify => "verify",
            Self::Remove => "remove",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

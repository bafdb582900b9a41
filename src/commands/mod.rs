//! Subcommand orchestration.
pub mod apply;
pub mod completions;
pub mod remove;
pub mod verify;
pub mod version;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::{Config, Settings};
use crate::linker::{Inspection, Linker, Report};
use crate::logging::{Log as _, Logger};
use crate::operations::SystemFileSystemOps;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded link configuration.
    pub config: Config,
    /// Linker configured from the global flags.
    pub linker: Linker,
}

impl CommandSetup {
    /// Resolve settings, load the link file, and log any warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// link file cannot be loaded.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let settings = Settings::from_env(global.overrides())?;

        log.stage("Loading configuration");
        let config = Config::load(&settings)
            .with_context(|| format!("loading {}", settings.config_path.display()))?;

        log.debug(&format!("root: {}", config.root.display()));
        log.debug(&format!("home: {}", config.home.display()));
        if !settings.profiles.is_empty() {
            log.info(&format!("profile: {}", settings.profiles.join(",")));
        }
        log.info(&format!(
            "loaded {} links, {} hooks",
            config.specs.len(),
            config.hooks.len()
        ));

        if !config.warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                config.warnings.len()
            ));
            for warning in &config.warnings {
                log.warn(&format!("  {warning}"));
            }
        }

        let linker = Linker::new(Arc::new(SystemFileSystemOps))
            .parallel(global.parallel)
            .dry_run(global.dry_run);

        Ok(Self { config, linker })
    }
}

/// Write a report in the requested format.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_report(out: &mut impl Write, report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for line in report.lines() {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
    }
    Ok(())
}

/// Write an inspection in the requested format.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_inspection(
    out: &mut impl Write,
    inspection: &Inspection,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for line in inspection.lines() {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", inspection.to_json()?)?,
    }
    Ok(())
}

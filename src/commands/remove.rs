//! Command: delete links that point at their sources.
use anyhow::Result;

use super::{CommandSetup, write_report};
use crate::cli::GlobalOpts;
use crate::logging::{Log as _, Logger};

/// Run the remove command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any entry could not
/// be removed.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Removing links");
    let report = setup.linker.remove(&setup.config.specs, log);
    write_report(&mut std::io::stdout().lock(), &report, global.format)?;
    log.info(&report.summary());
    log.show_log_path();

    let failures = report.failure_count();
    if failures > 0 {
        anyhow::bail!("{failures} link(s) could not be removed");
    }
    Ok(())
}

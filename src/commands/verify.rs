//! Command: check that every link is in place.
use anyhow::Result;

use super::{CommandSetup, write_inspection};
use crate::cli::GlobalOpts;
use crate::logging::{Log as _, Logger};

/// Run the verify command.  Read-only; `--dry-run` has no effect.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any link is not in
/// place.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Verifying links");
    let inspection = setup.linker.inspect(&setup.config.specs, log);
    write_inspection(&mut std::io::stdout().lock(), &inspection, global.format)?;
    log.info(&inspection.summary());
    log.show_log_path();

    let missing = inspection.verdicts().iter().filter(|ok| !**ok).count();
    if missing > 0 {
        anyhow::bail!(
            "{missing} of {} link(s) not in place",
            inspection.results.len()
        );
    }
    Ok(())
}

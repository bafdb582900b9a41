//! Command: create every missing link, then run post-apply hooks.
use anyhow::Result;

use super::{CommandSetup, write_report};
use crate::cli::GlobalOpts;
use crate::exec::Executor;
use crate::hooks;
use crate::logging::{Log as _, Logger};

/// Run the apply command.
///
/// Hooks run only after every link succeeded, and not at all with
/// `--no-hooks`.
///
/// # Errors
///
/// Returns an error if configuration loading fails, or if any link or hook
/// failed.
pub fn run(global: &GlobalOpts, log: &Logger, executor: &dyn Executor) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Linking dotfiles");
    let report = setup.linker.apply(&setup.config.specs, log);
    write_report(&mut std::io::stdout().lock(), &report, global.format)?;
    log.info(&report.summary());

    let hook_failures = if setup.config.hooks.is_empty() {
        0
    } else if global.no_hooks {
        log.info("skipping hooks (--no-hooks)");
        0
    } else if !report.is_success() {
        log.warn("skipping hooks because some links failed");
        0
    } else {
        hooks::run_hooks(&setup.config.hooks, executor, log, global.dry_run).len()
    };

    log.show_log_path();

    let link_failures = report.failure_count();
    if link_failures > 0 {
        anyhow::bail!("{link_failures} link(s) failed");
    }
    if hook_failures > 0 {
        anyhow::bail!("{hook_failures} hook(s) failed");
    }
    Ok(())
}

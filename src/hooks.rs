//! Post-apply hooks: external commands run after a successful apply.
use serde::Deserialize;

use crate::error::HookError;
use crate::exec::Executor;
use crate::logging::Log;

/// An external command declared in the link file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hook {
    /// Display name.
    pub name: String,
    /// Program to run, looked up on `PATH`.
    pub program: String,
    /// Arguments passed verbatim.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Run `hooks` in order.  Every hook runs even if an earlier one failed.
///
/// With `dry_run` set nothing is executed; each hook is logged as
/// `would run`.  Returns the failures, in hook order.
pub fn run_hooks(
    hooks: &[Hook],
    executor: &dyn Executor,
    log: &dyn Log,
    dry_run: bool,
) -> Vec<HookError> {
    if hooks.is_empty() {
        return Vec::new();
    }
    log.stage("Running hooks");

    let mut failures = Vec::new();
    for hook in hooks {
        let command_line = std::iter::once(hook.program.as_str())
            .chain(hook.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        if dry_run {
            log.dry_run(&format!("would run hook '{}': {command_line}", hook.name));
            continue;
        }

        match run_one(hook, executor) {
            Ok(stdout) => {
                log.info(&format!("hook '{}' ok", hook.name));
                if !stdout.is_empty() {
                    log.debug(&stdout);
                }
            }
            Err(e) => {
                log.error(&e.to_string());
                failures.push(e);
            }
        }
    }
    failures
}

fn run_one(hook: &Hook, executor: &dyn Executor) -> Result<String, HookError> {
    if !executor.which(&hook.program) {
        return Err(HookError::NotFound {
            name: hook.name.clone(),
            program: hook.program.clone(),
        });
    }
    let result = executor
        .run(&hook.program, &hook.args)
        .map_err(|e| HookError::Spawn {
            name: hook.name.clone(),
            message: format!("{e:#}"),
        })?;
    if !result.success {
        return Err(HookError::Failed {
            name: hook.name.clone(),
            code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        });
    }
    Ok(result.stdout.trim().to_string())
}

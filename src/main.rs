//! Command-line entry point for dotlink.
use anyhow::Result;
use clap::Parser;

use dotlink::cli::{Cli, Command};
use dotlink::commands;
use dotlink::exec::SystemExecutor;
use dotlink::logging::{self, Logger};

/// Install the tracing subscriber for `args` and return the matching logger.
fn start_logging(args: &Cli) -> Logger {
    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    Logger::new(name)
}

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match &args.command {
        Command::Apply => {
            let log = start_logging(&args);
            commands::apply::run(&args.global, &log, &SystemExecutor)
        }
        Command::Verify => {
            let log = start_logging(&args);
            commands::verify::run(&args.global, &log)
        }
        Command::Remove => {
            let log = start_logging(&args);
            commands::remove::run(&args.global, &log)
        }
        Command::Completions { shell } => {
            commands::completions::run(*shell);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}

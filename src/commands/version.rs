//! Command: print version information.
use std::io::Write as _;

/// The version string, e.g. `dotlink 0.1.0`.
#[must_use]
pub fn version_line() -> String {
    let version = option_env!("DOTLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    format!("dotlink {version}")
}

/// Print the dotlink version to stdout.
pub fn run() {
    writeln!(std::io::stdout().lock(), "{}", version_line()).ok();
}

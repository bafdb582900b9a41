//! Symlink-based dotfile installer.
//!
//! Reads a TOML link file that maps sources inside a dotfiles repository to
//! targets in the home directory, then creates, checks, or removes those
//! symlinks.  Every operation is idempotent and never overwrites a file it
//! did not create.
//!
//! The crate is layered as follows:
//!
//! - **[`config`]**: resolve settings, parse and validate the link file
//! - **[`resources`]**: the per-link `apply`/`remove` state machine
//! - **[`linker`]**: run resources over many entries and collect reports
//! - **[`commands`]**: top-level subcommands (`apply`, `verify`, `remove`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod hooks;
pub mod linker;
pub mod logging;
pub mod operations;
pub mod resources;

//! Log file location, escape stripping, and timestamps.
use std::path::{Path, PathBuf};

/// Remove terminal escape codes so the log file holds plain text.
///
/// A CSI sequence (`ESC [` params final-byte) is dropped whole; any other
/// escape drops `ESC` and the byte after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((head, tail)) = rest.split_once('\x1b') {
        out.push_str(head);
        let mut chars = tail.chars();
        if chars.next() == Some('[') {
            chars.by_ref().find(|c| ('@'..='~').contains(c));
        }
        rest = chars.as_str();
    }
    out.push_str(rest);
    out
}

/// Root of the user cache: `$XDG_CACHE_HOME`, else `~/.cache`.
fn cache_root() -> Option<PathBuf> {
    std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
}

/// Log file path for `command` below a given cache root.
pub(super) fn log_file_path_in(cache_root: &Path, command: &str) -> PathBuf {
    cache_root.join("dotlink").join(format!("{command}.log"))
}

/// Return the log file path under `$XDG_CACHE_HOME/dotlink/` (or `~/.cache/dotlink/`).
///
/// Only computes the path; the directory is created when the
/// [`FileLayer`](super::subscriber::FileLayer) opens the file.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(log_file_path_in(&cache_root()?, command))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

//! The [`Log`] sink used throughout the linker.

/// Destination for progress and diagnostic messages.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing` immediately;
/// [`BufferedLog`](super::buffered::BufferedLog) records messages so that
/// entries processed in parallel can be replayed in input order.
pub trait Log: Send + Sync + std::fmt::Debug {
    /// Section header, rendered as `==> msg`.
    fn stage(&self, msg: &str);
    /// Normal progress output.
    fn info(&self, msg: &str);
    /// Per-entry detail; console shows it only with `--verbose`.
    fn debug(&self, msg: &str);
    /// Something went wrong for one entry but the run continues.
    fn warn(&self, msg: &str);
    /// Failure that decides the exit code.
    fn error(&self, msg: &str);
    /// A mutation skipped because of `--dry-run`.
    fn dry_run(&self, msg: &str);
}

//! Rayon-based per-entry processing with ordered log replay.

use rayon::prelude::*;

use super::LinkSpec;
use crate::logging::{BufferedLog, Log};

/// Run `work` on every spec and return the outputs in input order.
///
/// Each entry logs into its own [`BufferedLog`]; the buffers are replayed
/// into `log` in input order after the batch completes, so output reads the
/// same whether or not the entries ran concurrently.
pub(super) fn map_entries<T: Send>(
    specs: &[LinkSpec],
    parallel: bool,
    log: &dyn Log,
    work: impl Fn(&LinkSpec, &dyn Log) -> T + Sync + Send,
) -> Vec<T> {
    let run = |spec: &LinkSpec| {
        let buffer = BufferedLog::new();
        let out = work(spec, &buffer);
        (out, buffer)
    };

    let done: Vec<(T, BufferedLog)> = if parallel {
        specs.par_iter().map(run).collect()
    } else {
        specs.iter().map(run).collect()
    };

    done.into_iter()
        .map(|(out, buffer)| {
            buffer.flush_to(log);
            out
        })
        .collect()
}

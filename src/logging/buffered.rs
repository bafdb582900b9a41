//! Buffered logger for parallel entry processing.
use std::sync::Mutex;

use super::types::Log;

/// A single buffered log entry, replayed when flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogEntry {
    Stage(String),
    Info(String),
    Debug(String),
    Warn(String),
    Error(String),
    DryRun(String),
}

impl LogEntry {
    fn replay(&self, log: &dyn Log) {
        match self {
            Self::Stage(msg) => log.stage(msg),
            Self::Info(msg) => log.info(msg),
            Self::Debug(msg) => log.debug(msg),
            Self::Warn(msg) => log.warn(msg),
            Self::Error(msg) => log.error(msg),
            Self::DryRun(msg) => log.dry_run(msg),
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Stage(m)
            | Self::Info(m)
            | Self::Debug(m)
            | Self::Warn(m)
            | Self::Error(m)
            | Self::DryRun(m) => m,
        }
    }
}

/// Implement the methods of [`Log`] by buffering each message into
/// `self.entries` as the corresponding [`LogEntry`] variant.
macro_rules! buffer_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// Logger that captures output in memory.
///
/// Each entry processed on a worker thread gets its own `BufferedLog`; the
/// linker replays them in input order once the batch completes, so the
/// console and log file read in the same order as the link list.
#[derive(Debug, Default)]
pub struct BufferedLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl BufferedLog {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay all buffered entries to `log`, in the order they were recorded.
    pub fn flush_to(&self, log: &dyn Log) {
        let entries = match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        for entry in &entries {
            entry.replay(log);
        }
    }

    /// Messages recorded so far, without their level.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().map_or_else(
            |_| Vec::new(),
            |guard| guard.iter().map(|e| e.message().to_string()).collect(),
        )
    }
}

impl Log for BufferedLog {
    buffer_log_methods! {
        stage   => Stage,
        info    => Info,
        debug   => Debug,
        warn    => Warn,
        error   => Error,
        dry_run => DryRun,
    }
}

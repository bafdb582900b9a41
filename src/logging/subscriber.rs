//! Tracing subscriber: console formatter, log file layer, and installation.
use std::fmt::Debug;
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level};

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "dotlink::stage";
/// Target used for dry-run action messages.
pub(super) const DRY_RUN_TARGET: &str = "dotlink::dry_run";

/// How an event is rendered, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Info,
    Debug,
    Warn,
    Error,
}

impl Kind {
    fn of(level: Level, target: &str) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if target == STAGE_TARGET => Self::Stage,
            Level::INFO if target == DRY_RUN_TARGET => Self::DryRun,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Colored console line.
    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::DryRun => format!("  \x1b[33m[dry run]\x1b[0m {msg}"),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  \x1b[2m{msg}\x1b[0m"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
        }
    }

    /// Plain log file line, without the timestamp.
    fn file_line(self, msg: &str) -> String {
        let msg = strip_ansi(msg);
        match self {
            Self::Stage => format!("==> {msg}"),
            Self::DryRun => format!("    [dry run] {msg}"),
            Self::Info => format!("    {msg}"),
            Self::Debug => format!("    [debug] {msg}"),
            Self::Warn => format!("    [warn] {msg}"),
            Self::Error => format!("    [error] {msg}"),
        }
    }
}

/// Pull the formatted `message` field out of an event.
fn message_of(event: &Event<'_>) -> String {
    #[derive(Default)]
    struct Message(String);

    impl Visit for Message {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                value.clone_into(&mut self.0);
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    let mut visitor = Message::default();
    event.record(&mut visitor);
    visitor.0
}

fn kind_of(event: &Event<'_>) -> Kind {
    let metadata = event.metadata();
    Kind::of(*metadata.level(), metadata.target())
}

/// Layer appending every event to the per-command log file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path` (creating its parent), write a run header, and open it
    /// for appending.  `None` if any of that fails; logging to the file is
    /// best effort.
    pub(super) fn new(path: &Path) -> Option<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let version =
            option_env!("DOTLINK_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!("{rule}\ndotlink {version} {}\n{rule}\n", format_utc_datetime());
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = kind_of(event).file_line(&message_of(event));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {line}", format_utc_time()).ok();
        }
    }
}

/// Console event format: one colored line per event, no timestamps.
struct DotlinkFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DotlinkFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", kind_of(event).console_line(&message_of(event)))
    }
}

/// Install the global subscriber for one `command` run.
///
/// Console output goes to stderr so that stdout carries nothing but the
/// command's report.  The console shows `INFO` and above (`DEBUG` with
/// `verbose`).  The log file at `$XDG_CACHE_HOME/dotlink/<command>.log`
/// always receives `DEBUG` and above.  A second call is a no-op.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let console_layer = fmt::layer()
        .event_format(DotlinkFormatter)
        .with_writer(std::io::stderr)
        .with_filter(console_level);

    let file_layer = log_file_path(command)
        .and_then(|path| FileLayer::new(&path))
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok();
}

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const LOG_FILE_PREFIX: &str = "steam-playtime.log";

/// Where console logs go. The CLI keeps stdout for its own output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Console {
    Stdout,
    Stderr,
}

/// Installs the global subscriber: `RUST_LOG` (or `default_filter`), a console
/// layer, and a daily-rolling file in `log_dir` when one is given.
///
/// Keep the returned guard alive for as long as the file should be written.
pub fn init_tracing(default_filter: &str, console: Console, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let writer = match console {
        Console::Stdout => BoxMakeWriter::new(std::io::stdout),
        Console::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(writer))
        .with(file_layer)
        .init();

    guard
}

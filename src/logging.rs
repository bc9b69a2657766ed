//! Subscriber setup for both commands.
//!
//! The snapshot command logs to stderr so stdout stays clean for its output.
//! The dashboard owns the terminal, so its logs go to a file instead.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const DEFAULT_CONSOLE_FILTER: &str = "warn,cryptopulse=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Console,
    File(PathBuf),
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init_logging(sink: &LogSink) -> Result<Option<WorkerGuard>> {
    match sink {
        LogSink::Console => {
            init_console();
            Ok(None)
        }
        LogSink::File(path) => init_file(path).map(Some),
    }
}

fn init_console() {
    // plain layer (only target="plain")
    let plain_fmt = fmt::format()
        .without_time()
        .with_level(false)
        .with_target(false)
        .compact();
    let plain_layer = fmt::layer()
        .event_format(plain_fmt)
        .with_writer(std::io::stderr)
        .with_filter(Targets::new().with_target("plain", LevelFilter::TRACE));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));
    let rich_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(plain_layer)
        .with(rich_layer)
        .init();
}

fn init_file(path: &Path) -> Result<WorkerGuard> {
    let (dir, file_name) = split_log_path(path)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info").add_directive(
            "cryptopulse=debug"
                .parse()
                .context("Invalid default log directive")?,
        ),
    };

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();
    Ok(guard)
}

/// `logs/app.log` -> (`logs`, `app.log`); a bare file name lands in `.`.
fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}

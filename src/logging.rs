//! Tracing setup for the `modver` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application.

use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Output format of log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Initialize the tracing subscriber.
///
/// Reads `MODVER_LOG`, defaulting to `warn`. Events go to stderr unless
/// `log_file` is given. The returned guard must be held until exit so
/// buffered file output is flushed.
///
/// # Example
/// ```bash
/// MODVER_LOG=modver=debug modver exec --use foo=1.0.0 -- ./app
/// ```
pub fn init(log_file: Option<&Path>, format: LogFormat) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| OsStr::new("modver.log"));
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_writer(writer).compact())
            .init(),
        LogFormat::Json => registry.with(fmt::layer().with_writer(writer).json()).init(),
    }

    guard
}

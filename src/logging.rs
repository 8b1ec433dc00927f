//! File-based tracing setup.
//!
//! The screen belongs to the table, so log output only ever goes to a file.
//! When the log file cannot be opened, logging is disabled rather than
//! spilling onto the display.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive; drop it last.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Install the global tracing subscriber.
///
/// `SCRY_LOG` overrides the level filter; otherwise `debug` selects between
/// DEBUG and WARN.
pub fn init_tracing(debug: bool, file: &Path) -> LogGuard {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SCRY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, guard) = match OpenOptions::new().create(true).append(true).open(file) {
        Ok(handle) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(handle);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        Err(_) => (BoxMakeWriter::new(std::io::sink), None),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    LogGuard { _guard: guard }
}

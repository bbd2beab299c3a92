//! Tracing setup for the `veil` binary.
//!
//! Two layers: a daily rolling file under `<config dir>/logs` at the
//! configured level, and stderr filtered by `RUST_LOG` (warnings only by
//! default, so command output stays readable).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_FILE_PREFIX: &str = "veil.log";

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init(level: &str, logs_dir: &Path) -> Option<WorkerGuard> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    if let Err(e) = std::fs::create_dir_all(logs_dir) {
        let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
        tracing::warn!(dir = %logs_dir.display(), error = %e, "file logging disabled");
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(EnvFilter::new(format!("{},hyper=warn,reqwest=warn", level)));

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Some(guard)
}

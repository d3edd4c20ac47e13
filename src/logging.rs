use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "PLANNER_LOG";
const LOG_FILE: &str = "planner-tui.log";

/// Send `tracing` output to `<dir>/planner-tui.log`.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path, default_filter: &str) -> color_eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init();

    Ok(guard)
}

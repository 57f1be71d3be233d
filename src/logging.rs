//! Tracing setup.
//!
//! The terminal belongs to the TUI while a game runs, so log output only
//! ever goes to a rolling file through a non-blocking writer. Without a log
//! directory no subscriber is installed and every event is discarded.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "ghost_typist.log";

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `log_level` when set. The returned guard flushes the
/// background writer on drop and must be held until exit. Returns `None`
/// when logging is disabled or a subscriber is already installed.
pub fn init_logging(log_level: &str, json_format: bool, log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let dir = log_dir?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("ghost-typist: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let result = if json_format {
        subscriber
            .with(fmt::layer().json().with_writer(non_blocking))
            .try_init()
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .try_init()
    };

    if result.is_err() {
        return None;
    }

    tracing::info!(log_level, json_format, dir = %dir.display(), "logging initialized");
    Some(guard)
}

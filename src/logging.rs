//! Logging configuration.
//!
//! Sets up tracing-based logging to a daily-rotated file. The wiring layer
//! calls [`init`] once at startup; library code only emits events.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Logs go to a file under `log_dir`, or a per-user data directory when none
/// is given. The level is controlled via the `STAMPBOOK_LOG` environment
/// variable:
/// - `STAMPBOOK_LOG=debug` for verbose output
/// - `STAMPBOOK_LOG=info` for standard output (default)
/// - `STAMPBOOK_LOG=warn` for warnings and errors only
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env("STAMPBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = log_dir.unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stampbook")
            .join("logs")
    });

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "stampbook.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // The guard must outlive the subscriber or buffered lines are lost;
    // init() runs once per process, so parking it in a static is enough.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(_guard);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!(dir = ?log_dir, "logging initialized");
    Ok(())
}

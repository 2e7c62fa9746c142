//! Logging setup for the desktop app.
//!
//! Events go to stderr and, when the platform data directory is usable, to
//! daily rotated files. The library itself only emits `tracing` events; which
//! subscriber receives them is decided by the binary.
//!
//! ## Usage
//!
//! ```no_run
//! use parquet_metadata_editor::logging;
//!
//! // Keep the guard alive until exit so buffered lines are flushed.
//! let _guard = logging::init().expect("Failed to initialize logging");
//! tracing::info!("App started");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const APP_DIR: &str = "parquet-metadata-editor";
const DEFAULT_FILTER: &str = "info";
const KEEP_LOG_FILES: usize = 10;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background file writers running. Dropping it flushes them.
#[must_use = "file logging stops when the guard is dropped"]
pub struct LogGuard {
    _workers: Vec<WorkerGuard>,
}

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/parquet-metadata-editor/logs`
/// - macOS: `~/Library/Application Support/parquet-metadata-editor/logs`
/// - Linux: `~/.local/share/parquet-metadata-editor/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let log_dir = dirs::data_dir()
        .context("Failed to determine data directory")?
        .join(APP_DIR)
        .join("logs");

    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    Ok(log_dir)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn daily_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(KEEP_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create '{prefix}' log appender"))
}

/// One layer for everything passing the env filter, one for warnings and errors.
fn file_layers(dir: &Path, workers: &mut Vec<WorkerGuard>) -> Result<Vec<BoxedLayer>> {
    let (all_writer, all_guard) = tracing_appender::non_blocking(daily_appender(dir, APP_DIR)?);
    let (error_writer, error_guard) =
        tracing_appender::non_blocking(daily_appender(dir, "error")?);
    workers.extend([all_guard, error_guard]);

    Ok(vec![
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(all_writer)
            .with_filter(env_filter())
            .boxed(),
        fmt::layer()
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(error_writer)
            .with_filter(EnvFilter::new("warn"))
            .boxed(),
    ])
}

/// Installs the global subscriber.
///
/// Creates two daily-rotated files, keeping the last 10 of each:
/// - `parquet-metadata-editor.<date>.log`: everything passing the env filter
/// - `error.<date>.log`: warnings and errors only
///
/// If the log directory cannot be used the editor still logs to stderr and a
/// warning is emitted once the subscriber is up.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed
pub fn init() -> Result<LogGuard> {
    let mut layers: Vec<BoxedLayer> = vec![
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .with_filter(env_filter())
            .boxed(),
    ];

    let mut workers = Vec::new();
    let file_setup = get_log_dir().and_then(|dir| {
        layers.extend(file_layers(&dir, &mut workers)?);
        Ok(dir)
    });

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("A global logger is already installed")?;

    match file_setup {
        Ok(dir) => tracing::info!("Logging initialized, log directory: {}", dir.display()),
        Err(err) => tracing::warn!("File logging disabled: {err:#}"),
    }

    Ok(LogGuard { _workers: workers })
}

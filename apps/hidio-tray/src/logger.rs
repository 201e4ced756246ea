//! Process-wide logging for the HID-IO client launcher.
//!
//! Dual output (colored stdout + plain `hidio.log` file) with thread-safe
//! initialization. The `VERBOSE` environment variable raises the level to
//! Debug. Log viewers catch up on past output by reading the same file back
//! via [`read_log_file`]; rotation is left to the platform.

use crate::error::TrayError;

use models::ErrorLocation;

use std::io::stdout;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Log file name.
pub const LOG_FILE_NAME: &str = "hidio.log";

/// Environment variable that raises the log level to Debug.
const VERBOSE_ENV_VAR: &str = "VERBOSE";

/// Warning message when logger is called multiple times.
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Effective log level: Debug when `VERBOSE` is set, Info otherwise.
fn log_level() -> LevelFilter {
    if std::env::var_os(VERBOSE_ENV_VAR).is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize the logger with dual output (stdout + file).
///
/// Safe to call multiple times - subsequent calls log a warning and return
/// Ok. The actual initialization runs exactly once.
///
/// # Arguments
///
/// * `log_dir` - Directory where the log file will be created
///
/// # Errors
///
/// Returns an error if the log file cannot be created or the dispatch
/// configuration fails.
pub fn initialize(log_dir: &Path) -> Result<(), TrayError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(log_dir);
        if result.is_ok() {
            info!("Logger initialized with level: {:?}", log_level());
        }
    });

    result
}

/// Internal logger initialization with dual dispatch.
#[track_caller]
fn initialize_internal(log_dir: &Path) -> Result<(), TrayError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    // Color configuration for stdout
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let base_dispatch = Dispatch::new().level(log_level());

    // Stdout dispatch (colored)
    let stdout_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        })
        .chain(stdout());

    // File dispatch (plain text, no colors)
    let file_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(fern::log_file(&log_file_path).map_err(|e| TrayError::Tray {
            message: format!("Failed to create log file: {e}"),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?);

    base_dispatch
        .chain(stdout_dispatch)
        .chain(file_dispatch)
        .apply()
        .map_err(|e| TrayError::Tray {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?;

    Ok(())
}

/// Read the existing log file for viewer catch-up.
///
/// Returns the file's contents without the trailing newline, or an empty
/// string if no log file exists yet (first launch).
///
/// # Errors
///
/// Returns [`TrayError::Tray`] if the file exists but cannot be read.
#[track_caller]
pub fn read_log_file(log_dir: &Path) -> Result<String, TrayError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    if !log_file_path.exists() {
        return Ok(String::new());
    }

    let mut contents = std::fs::read_to_string(&log_file_path).map_err(|e| TrayError::Tray {
        message: format!("Failed to read log file {}: {e}", log_file_path.display()),
        location: ErrorLocation::from(std::panic::Location::caller()),
    })?;

    if contents.ends_with('\n') {
        contents.pop();
    }

    Ok(contents)
}

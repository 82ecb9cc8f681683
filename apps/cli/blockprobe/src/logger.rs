//! Logging for the blockprobe binary.
//!
//! Logs go to stderr (colored) and optionally to a file. Stdout is left
//! for probe results so it can be piped.

use crate::error::BlockprobeError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
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
pub const LOG_FILE_NAME: &str = "blockprobe.log";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Initialize the logger.
///
/// Safe to call multiple times. Later calls log a warning and return Ok;
/// the dispatch is installed exactly once.
///
/// # Arguments
///
/// * `level` - Maximum level to emit
/// * `log_dir` - If set, logs are also appended to `{log_dir}/blockprobe.log`
///
/// # Errors
///
/// Returns an error if the log file cannot be created or the global logger
/// cannot be installed.
pub fn initialize(level: LevelFilter, log_dir: Option<&Path>) -> Result<(), BlockprobeError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = build_dispatch(level, log_dir).and_then(apply_dispatch);
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

/// Build the stderr (+ optional file) dispatch without installing it.
pub(crate) fn build_dispatch(
    level: LevelFilter,
    log_dir: Option<&Path>,
) -> Result<Dispatch, BlockprobeError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr());

    let mut dispatch = Dispatch::new().level(level).chain(stderr_dispatch);

    if let Some(log_dir) = log_dir {
        let log_file_path = log_dir.join(LOG_FILE_NAME);
        let log_file = fern::log_file(&log_file_path).map_err(|e| BlockprobeError::Blockprobe {
            message: format!(
                "Failed to create log file {}: {e}",
                log_file_path.display()
            ),
            location: ErrorLocation::from(Location::caller()),
        })?;

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
            .chain(log_file);

        dispatch = dispatch.chain(file_dispatch);
    }

    Ok(dispatch)
}

fn apply_dispatch(dispatch: Dispatch) -> Result<(), BlockprobeError> {
    dispatch.apply().map_err(|e| BlockprobeError::Blockprobe {
        message: format!("Failed to initialize logger: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

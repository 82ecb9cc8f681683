// Unit tests for logger module initialization logic
// Tests focus on idempotence and error handling

use crate::error::BlockprobeError;
use crate::logger::{LOG_FILE_NAME, build_dispatch, initialize};

use std::path::PathBuf;

use log::LevelFilter;
use tempfile::tempdir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to fail when trying to set a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = tempdir().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(LevelFilter::Debug, Some(temp_dir.path()));
    let result2 = initialize(LevelFilter::Debug, Some(temp_dir.path()));

    // THEN: Both should return Ok and the log file exists
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(result2.is_ok(), "Second initialization should succeed (idempotent)");
    assert!(temp_dir.path().join(LOG_FILE_NAME).exists());
}

/// **VALUE**: Verifies that an unusable log directory is a clear error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch if `fern::log_file()` gets unwrapped instead of
/// mapped into a BlockprobeError.
#[test]
fn given_invalid_log_dir_when_building_dispatch_then_returns_error() {
    // GIVEN: A path that cannot hold a file
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Building the dispatch
    let result = build_dispatch(LevelFilter::Info, Some(&invalid_dir));

    // THEN: Should return the app error variant
    assert!(matches!(result, Err(BlockprobeError::Blockprobe { .. })));
}

#[test]
fn given_no_log_dir_when_building_dispatch_then_succeeds() {
    assert!(build_dispatch(LevelFilter::Warn, None).is_ok());
}

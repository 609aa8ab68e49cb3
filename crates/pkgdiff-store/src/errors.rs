//! Error handling for pkgdiff-store
//!
//! Wraps pkgdiff-core ExError with store-specific helpers

use pkgdiff_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a missing snapshot error
pub fn not_found(path: &Path) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("resolve_snapshot")
        .with_path(path.display().to_string())
        .with_message("snapshot archive or directory does not exist")
}

/// Create an error for a source that cannot be used as given
pub fn usage_error(operation: &str, path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Usage)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create an archive extraction error
pub fn extraction_error(archive: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Extraction)
        .with_op("extract_archive")
        .with_path(archive.display().to_string())
        .with_message(reason.to_string())
}

/// Create a report write error
pub fn report_write_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::ReportWrite)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create an error for a worker thread that panicked
pub fn concurrency_error(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(operation.to_string())
        .with_message(reason)
}

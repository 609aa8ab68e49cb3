//! Report persistence
//!
//! Each report is rendered fully in memory and written once through a
//! temp file + rename, so a failed run never leaves a truncated report.

use crate::errors::{report_write_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Final combined schema/file report
pub const PACKAGE_REPORT_FILE: &str = "report.diff";

/// Terse update report name for a new-package label
pub fn update_report_file(new_label: &str) -> String {
    format!("updates_{}.diff", new_label)
}

/// Extended update report name for a new-package label
pub fn update_report_ext_file(new_label: &str) -> String {
    format!("updates_ext_{}.diff", new_label)
}

/// Atomically write bytes to a file
///
/// Uses temp file + rename to ensure atomic write
///
/// # Errors
///
/// - `ReportWrite`: the directory, temp file or rename failed
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| report_write_error("create_report_dir", parent, e))?;
    }

    let mut temp_name = target_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content)
        .map_err(|e| report_write_error("write_report_temp", &temp_path, e))?;

    fs::rename(&temp_path, target_path).map_err(|e| {
        fs::remove_file(&temp_path).ok();
        report_write_error("rename_report_temp", target_path, e)
    })?;

    Ok(())
}

/// Write one rendered report into `out_dir`, returning its path
///
/// # Errors
///
/// - `ReportWrite`: see [`atomic_write`]
pub fn write_report(out_dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let path = out_dir.join(file_name);
    atomic_write(&path, content.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = content.len(), "report written");
    Ok(path)
}

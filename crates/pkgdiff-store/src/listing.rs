//! Directory listing and file name patterns
//!
//! Only the top level of a snapshot directory is listed; snapshots are flat.

use crate::errors::{io_error, Result};
use pkgdiff_core::errors::{ExError, ExErrorKind};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Record files: one or two digit numeric name
pub const RECORD_FILE_PATTERN: &str = r"^\d{1,2}\.json$";

/// Dictionary (schema) files
pub const DICT_FILE_PATTERN: &str = r"^dict[A-Za-z]+\.json$";

static RECORD_FILES: OnceLock<Regex> = OnceLock::new();
static DICT_FILES: OnceLock<Regex> = OnceLock::new();

/// Names of the regular files directly inside `dir`, sorted.
///
/// With a pattern, only matching names are returned. Names that are not
/// valid UTF-8 are skipped.
///
/// # Errors
///
/// - `Io`: `dir` cannot be read
pub fn list_files(dir: &Path, pattern: Option<&Regex>) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| io_error("list_snapshot_dir", dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error("list_snapshot_dir", dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            tracing::debug!(dir = %dir.display(), "skipping non UTF-8 file name");
            continue;
        };
        if pattern.map_or(true, |re| re.is_match(&name)) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Record files in `dir`, see [`RECORD_FILE_PATTERN`]
///
/// # Errors
///
/// - `Io`: `dir` cannot be read
pub fn record_files(dir: &Path) -> Result<Vec<String>> {
    list_files(dir, Some(compiled(&RECORD_FILES, RECORD_FILE_PATTERN)?))
}

/// Dictionary files in `dir`, see [`DICT_FILE_PATTERN`]
///
/// # Errors
///
/// - `Io`: `dir` cannot be read
pub fn dict_files(dir: &Path) -> Result<Vec<String>> {
    list_files(dir, Some(compiled(&DICT_FILES, DICT_FILE_PATTERN)?))
}

fn compiled<'a>(cell: &'a OnceLock<Regex>, pattern: &str) -> Result<&'a Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("compile_file_pattern")
            .with_message(e.to_string())
    })?;
    Ok(cell.get_or_init(|| re))
}

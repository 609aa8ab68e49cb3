//! Snapshot archive extraction
//!
//! Snapshots arrive as tar archives, usually gzip-compressed. Compression is
//! detected from the gzip magic bytes rather than the file name.

use crate::errors::{extraction_error, io_error, Result};
use flate2::read::GzDecoder;
use pkgdiff_core::{log_op_end, log_op_error, log_op_start};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unpack `archive` into `target`.
///
/// `target` is emptied first so files from an earlier run cannot leak into
/// the comparison. Entries that would land outside `target` are rejected by
/// the tar reader.
///
/// # Errors
///
/// - `Io`: the archive cannot be opened or `target` cannot be prepared
/// - `Extraction`: the archive is not a readable (gzipped) tar
pub fn extract_archive(archive: &Path, target: &Path) -> Result<()> {
    log_op_start!(
        "extract_archive",
        path = %archive.display(),
        dest = %target.display()
    );
    let start = Instant::now();

    let result = prepare_target(target).and_then(|()| unpack(archive, target));

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(()) => {
            log_op_end!(
                "extract_archive",
                duration_ms = duration_ms,
                path = %archive.display()
            );
        }
        Err(err) => {
            log_op_error!(
                "extract_archive",
                err,
                duration_ms = duration_ms,
                path = %archive.display()
            );
        }
    }
    result
}

/// Whether the stream starts with the gzip magic bytes
pub fn is_gzip<R: BufRead>(reader: &mut R) -> std::io::Result<bool> {
    let head = reader.fill_buf()?;
    Ok(head.starts_with(&GZIP_MAGIC))
}

fn prepare_target(target: &Path) -> Result<()> {
    if target.exists() {
        tracing::warn!(dir = %target.display(), "removing stale extraction directory");
        fs::remove_dir_all(target).map_err(|e| io_error("clear_extraction_dir", target, e))?;
    }
    fs::create_dir_all(target).map_err(|e| io_error("create_extraction_dir", target, e))
}

fn unpack(archive: &Path, target: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| io_error("open_archive", archive, e))?;
    let mut reader = BufReader::new(file);
    let gzipped = is_gzip(&mut reader).map_err(|e| io_error("read_archive", archive, e))?;
    tracing::debug!(path = %archive.display(), gzipped, "detected archive format");

    if gzipped {
        unpack_from(GzDecoder::new(reader), archive, target)
    } else {
        unpack_from(reader, archive, target)
    }
}

fn unpack_from<R: Read>(reader: R, archive: &Path, target: &Path) -> Result<()> {
    tar::Archive::new(reader)
        .unpack(target)
        .map_err(|e| extraction_error(archive, e))
}

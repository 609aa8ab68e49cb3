//! Snapshot workspace
//!
//! Resolves the two snapshot sources, extracts archives side by side and
//! removes the extraction directories afterwards when the cleanup policy
//! allows it. Directories given as sources are used in place and are never
//! removed.

use crate::archive::extract_archive;
use crate::errors::{concurrency_error, io_error, not_found, usage_error, Result};
use dialoguer::Confirm;
use pkgdiff_core::errors::Side;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::thread;

/// Extraction directory name for the old snapshot
pub const OLD_PACKAGE_DIR: &str = "oldPackage";
/// Extraction directory name for the new snapshot
pub const NEW_PACKAGE_DIR: &str = "newPackage";

/// Where a snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Tar archive, optionally gzip-compressed
    Archive(PathBuf),
    /// Already unpacked snapshot directory
    Directory(PathBuf),
}

impl SnapshotSource {
    /// Classify `path` by what is on disk.
    ///
    /// # Errors
    ///
    /// - `NotFound`: nothing exists at `path`
    pub fn resolve(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Ok(SnapshotSource::Directory(path.to_path_buf()))
        } else if path.exists() {
            Ok(SnapshotSource::Archive(path.to_path_buf()))
        } else {
            Err(not_found(path))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SnapshotSource::Archive(p) | SnapshotSource::Directory(p) => p,
        }
    }
}

/// What to do with extracted snapshot directories once the run is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Prompt on the terminal, default no; never removes when not interactive
    #[default]
    Ask,
    /// Remove without asking
    Always,
    /// Keep without asking
    Never,
}

impl CleanupPolicy {
    /// Decide whether extracted directories should be removed
    pub fn confirm(&self) -> bool {
        match self {
            CleanupPolicy::Always => true,
            CleanupPolicy::Never => false,
            CleanupPolicy::Ask => {
                if io::stdin().is_terminal() && io::stdout().is_terminal() {
                    Confirm::new()
                        .with_prompt("Do you want to remove the temporary files?")
                        .default(false)
                        .interact()
                        .unwrap_or(false)
                } else {
                    tracing::info!("not running interactively, keeping extracted snapshots");
                    false
                }
            }
        }
    }
}

/// One snapshot ready for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSnapshot {
    /// Directory holding the snapshot's files
    pub root: PathBuf,
    /// True when `root` was created by extraction and may be removed
    pub extracted: bool,
}

/// Both snapshots of one run, ready for comparison.
#[derive(Debug)]
pub struct SnapshotWorkspace {
    old: PreparedSnapshot,
    new: PreparedSnapshot,
}

impl SnapshotWorkspace {
    /// Prepare both snapshots.
    ///
    /// Archives are extracted into `work_dir/oldPackage` and
    /// `work_dir/newPackage` on two scoped threads, joined before returning.
    /// When both fail, the old snapshot's error is returned.
    ///
    /// # Errors
    ///
    /// - `Usage`: a directory source lies inside the other side's extraction
    ///   directory, which extraction would clear
    /// - `Io` / `Extraction`: from extracting either archive
    /// - `Concurrency`: an extraction thread panicked
    pub fn prepare(old: &SnapshotSource, new: &SnapshotSource, work_dir: &Path) -> Result<Self> {
        let old_target = work_dir.join(OLD_PACKAGE_DIR);
        let new_target = work_dir.join(NEW_PACKAGE_DIR);

        ensure_outside_target(old, new, &new_target)?;
        ensure_outside_target(new, old, &old_target)?;

        let (old_result, new_result) = thread::scope(|scope| {
            let old_handle = scope.spawn(|| prepare_one(Side::Old, old, &old_target));
            let new_handle = scope.spawn(|| prepare_one(Side::New, new, &new_target));
            (
                join(old_handle, Side::Old),
                join(new_handle, Side::New),
            )
        });

        // both are joined at this point; report old first
        let old = old_result?;
        let new = new_result?;
        Ok(Self { old, new })
    }

    pub fn old_root(&self) -> &Path {
        &self.old.root
    }

    pub fn new_root(&self) -> &Path {
        &self.new.root
    }

    /// Remove extracted directories if `policy` agrees.
    ///
    /// Returns whether anything was removed. Nothing is asked when neither
    /// snapshot was extracted.
    ///
    /// # Errors
    ///
    /// - `Io`: an extraction directory could not be removed
    pub fn cleanup(self, policy: CleanupPolicy) -> Result<bool> {
        let removable: Vec<&Path> = [&self.old, &self.new]
            .into_iter()
            .filter(|s| s.extracted)
            .map(|s| s.root.as_path())
            .collect();
        if removable.is_empty() || !policy.confirm() {
            return Ok(false);
        }
        for dir in removable {
            fs::remove_dir_all(dir).map_err(|e| io_error("remove_extraction_dir", dir, e))?;
            tracing::info!(dir = %dir.display(), "removed extracted snapshot");
        }
        Ok(true)
    }
}

fn prepare_one(side: Side, source: &SnapshotSource, target: &Path) -> Result<PreparedSnapshot> {
    match source {
        SnapshotSource::Directory(dir) => {
            tracing::debug!(side = %side, dir = %dir.display(), "using snapshot directory in place");
            Ok(PreparedSnapshot {
                root: dir.clone(),
                extracted: false,
            })
        }
        SnapshotSource::Archive(archive) => {
            extract_archive(archive, target)?;
            Ok(PreparedSnapshot {
                root: target.to_path_buf(),
                extracted: true,
            })
        }
    }
}

/// Reject a directory source that extracting `other` into `target` would
/// delete. Nothing is extracted when `other` is itself a directory.
fn ensure_outside_target(
    source: &SnapshotSource,
    other: &SnapshotSource,
    target: &Path,
) -> Result<()> {
    let (SnapshotSource::Directory(dir), SnapshotSource::Archive(_)) = (source, other) else {
        return Ok(());
    };
    // a target that does not exist yet cannot contain an existing directory
    let Ok(target) = fs::canonicalize(target) else {
        return Ok(());
    };
    let dir_abs = fs::canonicalize(dir).map_err(|e| io_error("resolve_snapshot", dir, e))?;
    if dir_abs.starts_with(&target) {
        return Err(usage_error(
            "prepare_workspace",
            dir,
            format!(
                "snapshot directory is inside extraction directory {}; move it or use --work-dir",
                target.display()
            ),
        ));
    }
    Ok(())
}

fn join(
    handle: thread::ScopedJoinHandle<'_, Result<PreparedSnapshot>>,
    side: Side,
) -> Result<PreparedSnapshot> {
    handle.join().unwrap_or_else(|_| {
        Err(concurrency_error(
            "extract_archive",
            format!("{} snapshot extraction thread panicked", side),
        ))
    })
}
